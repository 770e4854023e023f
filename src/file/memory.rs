//! In-memory file backend, used for images that do not come from disk (fuzzing input,
//! synthetic test images).

use super::Backend;

/// Backend holding the image bytes in an owned buffer.
#[derive(Debug)]
pub struct Memory {
    data: Vec<u8>,
}

impl Memory {
    pub fn new(data: Vec<u8>) -> Memory {
        Memory { data }
    }
}

impl Backend for Memory {
    fn data(&self) -> &[u8] {
        &self.data
    }
}
