pub mod board;
pub mod column_ops;
pub mod dates;
pub mod derive;
pub mod filter;
pub mod selection;
pub mod sort;
pub mod task_ops;
pub mod timeline;
pub mod view_ops;
