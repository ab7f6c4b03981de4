//! Resident-memory sampling for the current process.

use sysinfo::{Pid, ProcessesToUpdate, System};

/// Samples the resident set size of this process.
pub struct RssSampler {
    system: System,
    pid: Option<Pid>,
}

impl RssSampler {
    /// Create a sampler for the current process.
    #[must_use]
    pub fn new() -> Self {
        Self {
            system: System::new(),
            pid: sysinfo::get_current_pid().ok(),
        }
    }

    /// Current resident memory in KB, or `None` where the platform cannot report it.
    pub fn sample_kb(&mut self) -> Option<u64> {
        let pid = self.pid?;
        self.system
            .refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
        self.system
            .process(pid)
            .map(|process| process.memory() / 1024)
    }
}

impl Default for RssSampler {
    fn default() -> Self {
        Self::new()
    }
}

/// Growth between two samples in KB; unknown samples count as no growth.
#[must_use]
pub fn rss_delta_kb(before: Option<u64>, after: Option<u64>) -> u64 {
    match (before, after) {
        (Some(b), Some(a)) => a.saturating_sub(b),
        _ => 0,
    }
}
