//! Output generation.
//!
//! - [`json`]: hourly JSON snapshots of the day's buffer
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── 2025-05-06/
//! │   ├── 00.json
//! │   ├── ...
//! │   └── 23.json
//! └── test_output/           # probe runs only
//!     └── 2025-05-06/
//!         └── 14.json
//! ```

pub mod json;
