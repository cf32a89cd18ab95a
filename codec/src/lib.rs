mod decoder;
mod reader;

pub use decoder::{decode_first_deal, decode_wrapper, Deal, WrapperMessage};
pub use reader::ByteReader;
