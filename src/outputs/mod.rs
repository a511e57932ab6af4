//! Output generation.
//!
//! - [`tables`]: writes the news, companies and contacts tables
//!
//! # Output Structure
//!
//! ```text
//! data/processed/
//! ├── news.csv
//! ├── companies.csv
//! └── contacts.csv
//! ```

pub mod tables;
