//! Pipeline stages around the slide extractor and prompt synthesizer.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ (slides + prompts) ──▶ ideogram ──▶ assemble
//! (read .md)                       (HTTP)       (PNG files + PDF)
//! ```
//!
//! 1. [`input`]    - read the markdown source, mapping I/O failures to typed errors
//! 2. [`ideogram`] - one generate call plus one image download per slide;
//!    the only stage with network I/O
//! 3. [`assemble`] - save `slide-NN.png` files and build `carousel.pdf`;
//!    decoding and compression run in `spawn_blocking`

pub mod assemble;
pub mod ideogram;
pub mod input;
