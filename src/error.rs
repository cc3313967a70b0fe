use crate::sweep::Coordinate;

#[derive(Debug, thiserror::Error)]
pub(crate) enum Error {
    #[error("board dimensions must be non-zero, got {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("number of mines ({mines}) must be between 1 and {max} for a board of {cells} cells")]
    InvalidMineCount {
        mines: usize,
        cells: usize,
        max: usize,
    },

    #[error("mine placed outside the board: {0:?}")]
    MineOutOfBounds(Coordinate),

    #[error("mine placed twice at coordinate: {0:?}")]
    DuplicateMine(Coordinate),

    #[error("failed to draw to terminal")]
    DrawToTerminal(#[source] std::io::Error),

    #[error("failed to get input event")]
    GetEvent(#[source] std::sync::mpsc::RecvError),

    #[error("failed to get ctrlc handler")]
    SetHandler(#[source] ctrlc::Error),

    #[error("failed to get stdout in raw mode")]
    GetStdoutInRawMode(#[source] std::io::Error),

    #[error("failed to get alternate screen for mouse terminal")]
    GetAlternateScreenForMouseTerminal(#[source] std::io::Error),

    #[error("failed to create terminal object")]
    CreateTerminal(#[source] std::io::Error),

    #[error("failed to convert usize to u16")]
    ConvertUsizeToU16,
}
