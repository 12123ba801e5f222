// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// This layer orchestrates the other layers to accomplish one
// goal at a time (training, detecting, word lookup).
//
// Rules for this layer:
//   - No ML math or model code here
//   - No printing here (that's Layer 1)
//   - No direct artifact file handling (that's Layer 4 and 6)
//   - Only workflow coordination
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// The training workflow
pub mod train_use_case;

// Loading a trained model and detecting languages
pub mod detect_use_case;

// Word and word-list detection
pub mod words_use_case;

// Reading text from an argument, a file or stdin
pub mod input;
