use clap::Parser;
use tripgraph::{app::TripGraphApp, TripGraphError};

fn main() -> Result<(), TripGraphError> {
    env_logger::init();
    let args = TripGraphApp::parse();
    args.run().inspect_err(|e| log::error!("{e}"))
}
