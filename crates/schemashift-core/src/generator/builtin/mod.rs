//! Built-in generators for changed objects.

mod changed_column;
mod changed_foreign_key;
mod changed_index;
mod changed_table;

pub use changed_column::ChangedColumnChangeGenerator;
pub use changed_foreign_key::ChangedForeignKeyChangeGenerator;
pub use changed_index::ChangedIndexChangeGenerator;
pub use changed_table::ChangedTableChangeGenerator;
