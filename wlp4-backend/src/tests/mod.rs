//! Backend tests
//!
//! Programs are built directly as typed trees. Lowering tests inspect the
//! emitted instructions; execution tests run the generated text on the VM.

mod builders;
mod execution_tests;
mod lowering_tests;
