/// UI side effects the controller triggers. Implementations must not call
/// back into the controller.
pub trait ChatView: Send + Sync {
    /// Called after every change to the message list.
    fn scroll_to_latest(&self);

    /// Called after the widget opens and after every send completes.
    fn focus_input(&self);
}

/// View for headless use.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopView;

impl ChatView for NoopView {
    fn scroll_to_latest(&self) {}

    fn focus_input(&self) {}
}
