/// Handle onto the hosting viewer.
///
/// The host owns its timeline and event loop; transforms only read the
/// current time step and may ask to be re-invoked when it changes. Passing
/// no context runs a transform exactly once on the data it was given.
pub trait ViewerContext {
    /// The time step currently shown by the viewer.
    fn current_time_step(&self) -> usize;

    /// Ask the host to call back when the shown time step changes.
    ///
    /// The default implementation ignores the request; hosts without a
    /// timeline need not override it.
    fn on_time_step_changed(&self, _callback: Box<dyn Fn(usize) + Send>) {}
}

/// A viewer context pinned to a fixed time step, for hosts without a
/// timeline and for tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct FixedTimeStep(pub usize);

impl ViewerContext for FixedTimeStep {
    fn current_time_step(&self) -> usize {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_time_step_reports_its_step() {
        let ctx = FixedTimeStep(3);
        assert_eq!(ctx.current_time_step(), 3);
    }

    #[test]
    fn subscription_is_optional() {
        let ctx = FixedTimeStep::default();
        // must not panic or block
        ctx.on_time_step_changed(Box::new(|_| {}));
    }
}
