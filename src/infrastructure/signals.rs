//! Interrupt handling while a child runs in the foreground
//!
//! Ctrl-C and Ctrl-\ reach the whole foreground process group. `tb` catches
//! them and keeps waiting, so the child alone decides how to react and its
//! exit status is still reported. Caught signals are reset to their default
//! action on `exec`, so the child starts with default dispositions.

use std::sync::Once;

use tracing::{debug, warn};

static INSTALL: Once = Once::new();

/// Keep `tb` alive on SIGINT/SIGQUIT. Installs the handlers once per process.
pub fn defer_interrupts_to_child() {
    INSTALL.call_once(|| {
        if let Err(e) = ctrlc::set_handler(|| debug!("interrupt received, waiting for child")) {
            warn!("cannot install interrupt handler: {}", e);
        }

        #[cfg(unix)]
        {
            use std::sync::atomic::AtomicBool;
            use std::sync::Arc;

            let quit = Arc::new(AtomicBool::new(false));
            if let Err(e) = signal_hook::flag::register(signal_hook::consts::SIGQUIT, quit) {
                warn!("cannot install quit handler: {}", e);
            }
        }
    });
}
