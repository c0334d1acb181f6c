#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    HiddenChanged {
        target: super::ObjectID,
        from: bool,
        to: bool,
    },
    /// The isolation store went from empty to holding `ids`.
    IsolationCaptured { ids: Box<[super::ObjectID]> },
    /// The isolation store went from holding `ids` to empty.
    IsolationDrained { ids: Box<[super::ObjectID]> },
}
