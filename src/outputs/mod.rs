//! Output persistence.
//!
//! # Submodules
//!
//! - [`csv`]: writes extracted articles and loads them back as a corpus
//!
//! # Output Structure
//!
//! ```text
//! BlogsData/
//! ├── dubai-1700000000.csv
//! └── abu-dhabi-1700003600.csv
//! ```

pub mod csv;
