// Utility functions and helpers
//
// This module provides general-purpose helpers for file I/O, text decoding
// and atomic writes.

pub mod io_utils;

pub use io_utils::{
    bytes_from_file, text_from_file, decode_bytes_to_string, get_encoding_object_by_label,
    skip_utf8_bom, path_suffix, with_suffix, write_atomic,
};
