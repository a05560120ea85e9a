pub mod drop_is_default_column;
