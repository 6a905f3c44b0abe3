//! A small compensating-action executor.
//!
//! A [`Saga`] runs its steps in order against a shared context. When a step
//! fails, every step that already completed is compensated in reverse order.
//! Compensation is best-effort: a failing compensation is logged and the
//! remaining ones still run, and the reported failure is always the one
//! raised by the forward step.

use error_stack::{Context, Report};

#[async_trait::async_trait]
pub trait SagaStep<C: Send, E: Context>: Sync + Send {
    fn name(&self) -> &'static str;

    async fn forward(&self, context: &mut C) -> error_stack::Result<(), E>;

    /// Undoes a completed [`SagaStep::forward`]. Steps with nothing to undo keep the default.
    async fn compensate(&self, _context: &mut C) -> error_stack::Result<(), E> {
        Ok(())
    }
}

#[derive(Debug)]
pub struct SagaFailure<E> {
    pub step: &'static str,
    pub report: Report<E>,
    /// `false` if at least one compensation failed.
    pub compensated: bool,
}

pub struct Saga<'a, C, E> {
    name: &'static str,
    steps: Vec<Box<dyn SagaStep<C, E> + 'a>>,
}

impl<'a, C: Send, E: Context> Saga<'a, C, E> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            steps: Vec::new(),
        }
    }

    pub fn step(mut self, step: impl SagaStep<C, E> + 'a) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    pub async fn execute(&self, mut context: C) -> Result<C, SagaFailure<E>> {
        for (index, step) in self.steps.iter().enumerate() {
            tracing::trace!(saga = self.name, step = step.name(), "forward");
            if let Err(report) = step.forward(&mut context).await {
                tracing::warn!(
                    saga = self.name,
                    step = step.name(),
                    error = %report,
                    "step failed, compensating {} completed step(s)",
                    index
                );
                let compensated = self.compensate(&self.steps[..index], &mut context).await;
                return Err(SagaFailure {
                    step: step.name(),
                    report,
                    compensated,
                });
            }
        }
        tracing::debug!(saga = self.name, "completed");
        Ok(context)
    }

    async fn compensate(&self, completed: &[Box<dyn SagaStep<C, E> + 'a>], context: &mut C) -> bool {
        let mut clean = true;
        for step in completed.iter().rev() {
            tracing::trace!(saga = self.name, step = step.name(), "compensate");
            if let Err(report) = step.compensate(context).await {
                tracing::error!(
                    saga = self.name,
                    step = step.name(),
                    error = ?report,
                    "compensation failed"
                );
                clean = false;
            }
        }
        clean
    }
}

#[cfg(test)]
mod test {
    use std::fmt::{Display, Formatter};
    use std::sync::Mutex;

    use error_stack::{Context, Report};

    use super::{Saga, SagaStep};

    #[derive(Debug, PartialEq, Eq)]
    struct Boom(&'static str);

    impl Display for Boom {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            write!(f, "boom at {}", self.0)
        }
    }

    impl Context for Boom {}

    type Journal = Mutex<Vec<String>>;

    fn entries(journal: &Journal) -> Vec<String> {
        journal.lock().expect("journal poisoned").clone()
    }

    struct Record<'a> {
        name: &'static str,
        journal: &'a Journal,
        fail_forward: bool,
        fail_compensate: bool,
    }

    impl<'a> Record<'a> {
        fn ok(name: &'static str, journal: &'a Journal) -> Self {
            Self {
                name,
                journal,
                fail_forward: false,
                fail_compensate: false,
            }
        }

        fn failing(mut self) -> Self {
            self.fail_forward = true;
            self
        }

        fn stuck(mut self) -> Self {
            self.fail_compensate = true;
            self
        }
    }

    #[async_trait::async_trait]
    impl SagaStep<u32, Boom> for Record<'_> {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn forward(&self, counter: &mut u32) -> error_stack::Result<(), Boom> {
            if self.fail_forward {
                return Err(Report::new(Boom(self.name)));
            }
            *counter += 1;
            self.journal
                .lock()
                .expect("journal poisoned")
                .push(format!("+{}", self.name));
            Ok(())
        }

        async fn compensate(&self, counter: &mut u32) -> error_stack::Result<(), Boom> {
            if self.fail_compensate {
                return Err(Report::new(Boom(self.name)));
            }
            *counter -= 1;
            self.journal
                .lock()
                .expect("journal poisoned")
                .push(format!("-{}", self.name));
            Ok(())
        }
    }

    #[tokio::test]
    async fn runs_every_step_in_order() {
        let journal = Journal::default();
        let saga = Saga::new("test")
            .step(Record::ok("a", &journal))
            .step(Record::ok("b", &journal))
            .step(Record::ok("c", &journal));

        let counter = saga.execute(0).await.expect("no step fails");
        assert_eq!(counter, 3);
        assert_eq!(entries(&journal), ["+a", "+b", "+c"]);
    }

    #[tokio::test]
    async fn compensates_completed_steps_in_reverse() {
        let journal = Journal::default();
        let saga = Saga::new("test")
            .step(Record::ok("a", &journal))
            .step(Record::ok("b", &journal))
            .step(Record::ok("c", &journal).failing())
            .step(Record::ok("d", &journal));

        let failure = saga.execute(0).await.expect_err("step c fails");
        assert_eq!(failure.step, "c");
        assert_eq!(failure.report.current_context(), &Boom("c"));
        assert!(failure.compensated);
        assert_eq!(entries(&journal), ["+a", "+b", "-b", "-a"]);
    }

    #[tokio::test]
    async fn first_step_failure_has_nothing_to_undo() {
        let journal = Journal::default();
        let saga = Saga::new("test")
            .step(Record::ok("a", &journal).failing())
            .step(Record::ok("b", &journal));

        let failure = saga.execute(0).await.expect_err("step a fails");
        assert_eq!(failure.step, "a");
        assert!(failure.compensated);
        assert!(entries(&journal).is_empty());
    }

    #[tokio::test]
    async fn broken_compensation_keeps_original_failure() {
        let journal = Journal::default();
        let saga = Saga::new("test")
            .step(Record::ok("a", &journal))
            .step(Record::ok("b", &journal).stuck())
            .step(Record::ok("c", &journal).failing());

        let failure = saga.execute(0).await.expect_err("step c fails");
        assert_eq!(failure.step, "c");
        assert_eq!(failure.report.current_context(), &Boom("c"));
        assert!(!failure.compensated);
        // compensation of a still runs after b could not be undone
        assert_eq!(entries(&journal), ["+a", "+b", "-a"]);
    }
}
