use clap::Parser;
use frame_viewer::display_loop::Resolution;
use frame_viewer::stats_server::{run_server, ServerArgs, SyntheticPipeline};

#[derive(Parser, Debug)]
#[command(author, version, about = "Stub server for previewing processed frames")]
struct Args {
    #[command(flatten)]
    server: ServerArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    frame_viewer::logging::init_tracing();

    let args = Args::parse();
    run_server(&args.server, SyntheticPipeline::new(Resolution::VGA)).await
}
