use thiserror::Error;

/// Bootstrap progress, advanced once per process.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Uninitialized,
    WindowCreated,
    InstanceCreated,
    Running,
    Terminating,
    Destroyed,
    Failed,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Illegal lifecycle transition {from:?} -> {to:?}.")]
pub struct LifecycleError {
    pub from: Lifecycle,
    pub to: Lifecycle,
}

impl Lifecycle {
    pub fn can_advance_to(self, next: Lifecycle) -> bool {
        use Lifecycle::*;
        matches!(
            (self, next),
            (Uninitialized, WindowCreated)
                | (WindowCreated, InstanceCreated)
                | (InstanceCreated, Running)
                | (Running, Terminating)
                | (Terminating, Destroyed)
                | (Uninitialized, Failed)
                | (WindowCreated, Failed)
        )
    }

    pub fn advance(&mut self, next: Lifecycle) -> Result<(), LifecycleError> {
        if !self.can_advance_to(next) {
            return Err(LifecycleError {
                from: *self,
                to: next,
            });
        }
        tracing::debug!("lifecycle {:?} -> {:?}", self, next);
        *self = next;
        Ok(())
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Lifecycle::Destroyed | Lifecycle::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path() {
        let mut state = Lifecycle::Uninitialized;
        for next in [
            Lifecycle::WindowCreated,
            Lifecycle::InstanceCreated,
            Lifecycle::Running,
            Lifecycle::Terminating,
            Lifecycle::Destroyed,
        ] {
            state.advance(next).unwrap();
        }
        assert!(state.is_terminal());
    }

    #[test]
    fn failure_only_during_setup() {
        assert!(Lifecycle::Uninitialized.can_advance_to(Lifecycle::Failed));
        assert!(Lifecycle::WindowCreated.can_advance_to(Lifecycle::Failed));
        assert!(!Lifecycle::InstanceCreated.can_advance_to(Lifecycle::Failed));
        assert!(!Lifecycle::Running.can_advance_to(Lifecycle::Failed));
    }

    #[test]
    fn failed_never_reaches_running() {
        let mut state = Lifecycle::WindowCreated;
        state.advance(Lifecycle::Failed).unwrap();
        assert_eq!(
            state.advance(Lifecycle::Running),
            Err(LifecycleError {
                from: Lifecycle::Failed,
                to: Lifecycle::Running
            })
        );
        assert_eq!(state, Lifecycle::Failed);
    }

    #[test]
    fn no_skipping() {
        assert!(!Lifecycle::Uninitialized.can_advance_to(Lifecycle::Running));
        assert!(!Lifecycle::WindowCreated.can_advance_to(Lifecycle::Running));
        assert!(!Lifecycle::Destroyed.can_advance_to(Lifecycle::Uninitialized));
    }
}
