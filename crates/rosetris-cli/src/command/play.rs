use rosetris_engine::{GameSession, QueueSeed};

use crate::ui::app::PlayApp;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Piece-sequence seed as a 32-character hex string (random when omitted)
    #[clap(long)]
    seed: Option<QueueSeed>,
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let session = match arg.seed {
        Some(seed) => GameSession::with_seed(seed),
        None => GameSession::new(),
    };

    let mut terminal = ratatui::init();
    let result = PlayApp::new(session).run(&mut terminal);
    ratatui::restore();
    result
}
