use bagforge_core::Communities;
use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

pub fn partition_summary(title: &str, communities: &Communities, cost: f64) {
    println!("\n=== {} ===", title);
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Bag").add_attribute(Attribute::Bold),
        Cell::new("Size"),
        Cell::new("Members"),
    ]);
    if let Some(col) = table.column_mut(1) {
        col.set_cell_alignment(CellAlignment::Right);
    }

    for (id, nodes) in communities.iter() {
        let members = nodes
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<String>>()
            .join(" ");
        table.add_row(vec![
            Cell::new(id).add_attribute(Attribute::Bold),
            Cell::new(nodes.len()),
            Cell::new(members),
        ]);
    }
    table.add_row(vec![
        Cell::new("Cost").fg(Color::Cyan),
        Cell::new(""),
        Cell::new(format!("{:.6}", cost)).fg(Color::Cyan),
    ]);
    println!("{}", table);
}
