mod tables;

pub use self::tables::partition_summary as print_partition_summary;
