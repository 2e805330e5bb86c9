//! Events that trigger state transitions

/// Events seen by the refresh consumer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    // Producer events
    /// The producer erased its buffer and began drawing
    FrameStarted,
    /// A complete, non-empty frame was claimed for display
    FrameArmed,
    /// The claimed frame turned out to be empty
    FrameCleared,

    // Backend events
    /// A transfer of the displayed frame began
    TransferStarted,
    /// The backend reported the transfer finished
    TransferComplete,

    // Screen saver events
    /// The countdown reached zero
    SaverExpired,
    /// A buffer-mutating call was made
    Activity,
}
