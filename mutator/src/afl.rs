//! The C ABI the host fuzzer loads from this shared object. Each export is a
//! thin unsafe veneer over [`GurthangMutator`]; the mutator pointer handed
//! out by `afl_custom_init` is an opaque boxed coordinator, and every buffer
//! returned through an out-pointer stays owned by it.
#![allow(clippy::missing_safety_doc)]

use std::ffi::{c_char, c_int, c_uchar, c_uint, c_void, CStr};
use std::os::unix::ffi::OsStrExt;
use std::path::Path;
use std::slice;

use crate::coordinator::GurthangMutator;

unsafe fn input_slice<'a>(buf: *mut u8, buf_size: usize) -> &'a [u8] {
    if buf.is_null() || buf_size == 0 {
        &[]
    } else {
        slice::from_raw_parts(buf, buf_size)
    }
}

#[no_mangle]
pub extern "C" fn afl_custom_init(_afl: *mut c_void, seed: c_uint) -> *mut GurthangMutator {
    Box::into_raw(Box::new(GurthangMutator::new(seed as u64)))
}

#[no_mangle]
pub unsafe extern "C" fn afl_custom_deinit(mutator: *mut GurthangMutator) {
    if !mutator.is_null() {
        drop(Box::from_raw(mutator));
    }
}

#[no_mangle]
pub unsafe extern "C" fn afl_custom_fuzz(
    mutator: *mut GurthangMutator,
    buf: *mut u8,
    buf_size: usize,
    out_buf: *mut *mut u8,
    _add_buf: *mut u8,
    _add_buf_size: usize,
    max_size: usize,
) -> usize {
    let mutator = &mut *mutator;
    let out = mutator.fuzz(input_slice(buf, buf_size), max_size);
    *out_buf = out.as_ptr() as *mut u8;
    out.len()
}

#[no_mangle]
pub unsafe extern "C" fn afl_custom_havoc_mutation(
    mutator: *mut GurthangMutator,
    buf: *mut u8,
    buf_size: usize,
    out_buf: *mut *mut u8,
    max_size: usize,
) -> usize {
    let mutator = &mut *mutator;
    let out = mutator.havoc_mutation(input_slice(buf, buf_size), max_size);
    *out_buf = out.as_ptr() as *mut u8;
    out.len()
}

#[no_mangle]
pub unsafe extern "C" fn afl_custom_havoc_mutation_probability(
    mutator: *mut GurthangMutator,
) -> c_uchar {
    (*mutator).havoc_probability()
}

#[no_mangle]
pub unsafe extern "C" fn afl_custom_queue_get(
    mutator: *mut GurthangMutator,
    filename: *const c_char,
) -> c_uchar {
    if filename.is_null() {
        return 0;
    }
    let path = Path::new(std::ffi::OsStr::from_bytes(
        CStr::from_ptr(filename).to_bytes(),
    ));
    (*mutator).judge(path) as c_uchar
}

#[no_mangle]
pub unsafe extern "C" fn afl_custom_fuzz_count(
    mutator: *mut GurthangMutator,
    buf: *mut u8,
    buf_size: usize,
) -> c_uint {
    (*mutator).fuzz_count(input_slice(buf, buf_size))
}

#[no_mangle]
pub unsafe extern "C" fn afl_custom_describe(
    mutator: *mut GurthangMutator,
    _max_description_len: usize,
) -> *const c_char {
    (*mutator).describe_cstr().as_ptr()
}

#[no_mangle]
pub unsafe extern "C" fn afl_custom_init_trim(
    mutator: *mut GurthangMutator,
    buf: *mut u8,
    buf_size: usize,
) -> c_int {
    (*mutator).init_trim(input_slice(buf, buf_size))
}

#[no_mangle]
pub unsafe extern "C" fn afl_custom_trim(
    mutator: *mut GurthangMutator,
    out_buf: *mut *mut u8,
) -> usize {
    let mutator = &mut *mutator;
    let out = mutator.trim();
    *out_buf = out.as_ptr() as *mut u8;
    out.len()
}

#[no_mangle]
pub unsafe extern "C" fn afl_custom_post_trim(
    mutator: *mut GurthangMutator,
    success: c_uchar,
) -> c_int {
    (*mutator).post_trim(success != 0)
}
