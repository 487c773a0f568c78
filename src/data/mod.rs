/// Data layer: core types and frame loading.
///
/// Architecture:
/// ```text
///  frame .csv (u16 counts)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Frame
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │   Frame   │  height × width detector counts
///   └──────────┘
///        │
///        ▼
///   processing pipeline → Analysis (spectrum, peaks, biosignature)
/// ```

pub mod loader;
pub mod model;
