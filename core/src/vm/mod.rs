//! Reference interpreter for lowered modules.

pub mod err;
pub mod exec;
pub mod sink;

pub use err::VmError;
pub use sink::{StdoutSink, ValueSink};

use log::debug;

use crate::ir::module::IrModule;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VmOptions {
    /// Abort after this many executed instructions and terminators.
    pub step_limit: Option<usize>,
    /// Emit a `trace!` record per executed step.
    pub trace: bool,
}

/// Run the module's routine and return its `ret` value.
pub fn run_module(module: &IrModule, sink: &mut dyn ValueSink, opts: &VmOptions) -> Result<i32, VmError> {
    let mut state = exec::ExecState::new(module, opts);
    let result = state.run(sink);
    debug!("vm finished after {} step(s)", state.steps);
    result
}
