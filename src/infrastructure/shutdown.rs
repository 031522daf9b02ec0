use tokio::sync::watch;

/// Cancellation token for the run. Cloned into the signal handlers, which set it.
#[derive(Clone)]
pub struct Shutdown {
    sender: watch::Sender<bool>,
}

#[derive(Clone)]
pub struct ShutdownListener {
    receiver: watch::Receiver<bool>,
}

impl Shutdown {
    pub fn new() -> (Self, ShutdownListener) {
        let (sender, receiver) = watch::channel(false);
        (Self { sender }, ShutdownListener { receiver })
    }

    pub fn subscribe(&self) -> ShutdownListener {
        ShutdownListener {
            receiver: self.sender.subscribe(),
        }
    }

    pub fn trigger(&self) {
        let _ = self.sender.send(true);
    }
}

impl ShutdownListener {
    /// Resolves once shutdown has been requested. Never resolves if every
    /// `Shutdown` handle is dropped without triggering.
    pub async fn notified(&mut self) {
        if *self.receiver.borrow() {
            return;
        }
        let sender_alive = self.receiver.wait_for(|triggered| *triggered).await.is_ok();
        if !sender_alive {
            std::future::pending::<()>().await;
        }
    }

    pub fn is_triggered(&self) -> bool {
        *self.receiver.borrow()
    }
}

pub fn install_signal_handlers(shutdown: Shutdown) {
    let ctrlc = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!(target: "lifecycle", "interrupt received, saving results before exit");
            ctrlc.trigger();
        }
    });

    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let term = shutdown.clone();
        tokio::spawn(async move {
            if let Ok(mut sig) = signal(SignalKind::terminate()) {
                sig.recv().await;
                tracing::warn!(target: "lifecycle", "SIGTERM received, saving results before exit");
                term.trigger();
            }
        });
    }

    #[cfg(windows)]
    {
        let brk = shutdown.clone();
        tokio::spawn(async move {
            if let Ok(mut sig) = tokio::signal::windows::ctrl_break() {
                sig.recv().await;
                tracing::warn!(target: "lifecycle", "Ctrl+Break received, saving results before exit");
                brk.trigger();
            }
        });
    }
}
