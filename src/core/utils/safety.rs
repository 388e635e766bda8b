//! Zero-Cost Safety Macros
//!
//! Hot loops (pairwise forces, grid scans) index cell offsets and particle
//! slices millions of times per second.
//!
//! In Debug mode: Normal bounds-checked access (panics with useful errors)
//! In Release mode: Unchecked access (indices are produced by the grid and
//! are always inside the particle buffer)
//!
//! Usage:
//! ```rust
//! use starfall_engine::fast;
//!
//! let cell = 2;
//!
//! let cell_start = vec![0usize, 3, 3, 7, 9];
//! // Read: fast!(slice, [index])
//! let start = *fast!(cell_start, [cell]);
//! assert_eq!(start, 3);
//!
//! let mut cell_count = vec![0u32; 5];
//! // Write: fast!(slice, [index] = value)
//! fast!(cell_count, [cell] = 4);
//! assert_eq!(cell_count[cell], 4);
//! ```

/// Bounds-checked in debug, unchecked in release.
///
/// Callers must only pass indices derived from grid bookkeeping
/// (`cell_start + k` with `k < cell_count`, clamped cell keys).
#[macro_export]
macro_rules! fast {
    // Read pattern: fast!(slice, [index])
    ($slice:expr, [$index:expr]) => {{
        #[cfg(debug_assertions)]
        {
            &$slice[$index]
        }
        #[cfg(not(debug_assertions))]
        {
            unsafe { $slice.get_unchecked($index) }
        }
    }};

    // Write pattern: fast!(slice, [index] = value)
    ($slice:expr, [$index:expr] = $val:expr) => {{
        #[cfg(debug_assertions)]
        {
            $slice[$index] = $val;
        }
        #[cfg(not(debug_assertions))]
        {
            unsafe {
                *$slice.get_unchecked_mut($index) = $val;
            }
        }
    }};
}

/// Mutable element access, same debug/release split as [`fast!`].
#[macro_export]
macro_rules! fast_mut {
    ($slice:expr, [$index:expr]) => {{
        #[cfg(debug_assertions)]
        {
            &mut $slice[$index]
        }
        #[cfg(not(debug_assertions))]
        {
            unsafe { $slice.get_unchecked_mut($index) }
        }
    }};
}
