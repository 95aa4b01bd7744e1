//! Constants for the 3D spatial tree.

/// Default maximum number of objects per leaf bucket
pub const DEFAULT_LEAF_CAPACITY: usize = 8;

/// Smallest usable leaf capacity
pub const MIN_LEAF_CAPACITY: usize = 1;

/// Default seed for the split-selection random source
pub const DEFAULT_SEED: u64 = 123;

/// Spaces of indentation per tree level in dumps
pub const DUMP_INDENT: usize = 2;
