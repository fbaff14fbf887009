//! Console output

mod summary;

pub use summary::{
    format_cleanup_summary, format_pass_summary, print_cleanup_summary, print_pass_summary,
};
