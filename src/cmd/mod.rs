/*!
Command layers for the two binaries.

  src/cmd/
    mod.rs        (this file)
    dispatch.rs   (Invocation parsing + Dispatcher for `busyrs`)
    usage.rs      (general / per-function usage text)
    generate.rs   (GenerateArgs + execute_generate for `busyrs-gen`)

Conventions:
  - Argument structs derive `clap` traits and stay minimal.
  - Command entry points write to caller-supplied sinks so they can be
    driven in-process by tests.
*/

pub mod dispatch;
pub mod generate;
pub mod usage;

pub use dispatch::{BASE_NAME, Dispatcher, Exit, Invocation, Request};
pub use generate::{DumpFormat, GenerateArgs, execute_generate};
