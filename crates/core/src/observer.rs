/// Receives solver events and optionally returns control actions.
///
/// Solvers emit an event after each unit of work (a step, an evaluation, a
/// sample). An observer inspects the event and may answer with an action the
/// solver understands, such as stopping early. Returning `None` lets the
/// solver continue unaffected.
///
/// Two implementations cover most uses without a dedicated type:
///
/// - `()` observes nothing and never returns an action, for unobserved runs.
/// - Any `FnMut(&E) -> Option<A>` closure, for ad hoc recording or stopping
///   logic at the call site.
///
/// # Example
///
/// ```
/// use cascade_core::Observer;
///
/// struct Tick(u32);
///
/// let mut count = 0;
/// let mut observer = |_event: &Tick| -> Option<()> {
///     count += 1;
///     None
/// };
///
/// observer.observe(&Tick(1));
/// observer.observe(&Tick(2));
///
/// assert_eq!(count, 2);
/// ```
pub trait Observer<E, A> {
    /// Inspects an event and optionally returns an action for the solver.
    fn observe(&mut self, event: &E) -> Option<A>;
}

/// The no-op observer: sees every event, never acts on one.
impl<E, A> Observer<E, A> for () {
    fn observe(&mut self, _event: &E) -> Option<A> {
        None
    }
}

impl<E, A, F> Observer<E, A> for F
where
    F: FnMut(&E) -> Option<A>,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        self(event)
    }
}
