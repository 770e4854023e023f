#![no_main]

use libfuzzer_sys::fuzz_target;
use publiciser::{metadata::CilAssembly, rewriter::publicise};

fuzz_target!(|data: &[u8]| {
    if let Ok(mut assembly) = CilAssembly::from_mem(data.to_vec()) {
        publicise(&mut assembly);
        let _ = assembly.to_bytes();
    }
});
