// Registrar - bind exported names to implementations through the host

use crate::host::{FunctionHost, HostError};
use crate::set::FunctionSet;

/// What happened during one registration pass.
#[derive(Debug, Default)]
pub struct RegistrationReport {
    pub registered: Vec<&'static str>,
    pub failed: Vec<(&'static str, HostError)>,
}

impl RegistrationReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Associate every exported function with `host`, once each.
///
/// Each association is attempted on its own: a rejected name is logged
/// and the rest still get registered.
pub fn register_all(host: &dyn FunctionHost, functions: &FunctionSet) -> RegistrationReport {
    let mut report = RegistrationReport::default();

    for (name, implementation) in functions.exports() {
        match host.associate(name, implementation) {
            Ok(()) => report.registered.push(name),
            Err(e) => {
                log::warn!("Failed to register {}: {}", name, e);
                report.failed.push((name, e));
            }
        }
    }

    log::info!(
        "Registered {} of {} functions",
        report.registered.len(),
        report.registered.len() + report.failed.len()
    );
    report
}
