use std::process;

use mapprint::{
    application::{
        error::AppError,
        ports::{Delivery, DocumentSink, TokioClock},
        print::{PrintProfile, PrintService},
    },
    config::{self, Command, RenderArgs, Settings, SubmitArgs},
    domain::layout::Layout,
    infra::{
        delivery::{FileSink, LinkSink},
        error::InfraError,
        files,
        http::PrintClient,
        telemetry,
    },
};
use serde_json::json;
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt()
        .with_max_level(Level::ERROR)
        .with_writer(std::io::stderr)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()?;
    telemetry::init(&settings.logging)?;

    match cli_args.command {
        Command::Render(args) => run_render(&settings, &args),
        Command::Submit(args) => run_submit(&settings, &args).await,
        Command::Layouts => {
            list_layouts();
            Ok(())
        }
    }
}

fn run_render(settings: &Settings, args: &RenderArgs) -> Result<(), AppError> {
    let snapshot = files::read_snapshot(&args.snapshot)?;
    let service = print_service(settings)?;

    let built = service.prepare(&snapshot);
    let output = json!({
        "appId": built.app_id(),
        "reportUrl": service
            .backend()
            .report_url(built.app_id(), &snapshot.options.format)
            .map_err(|err| InfraError::client(err.to_string()))?
            .as_str(),
        "request": built.request,
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&output).map_err(InfraError::from)?
    );
    Ok(())
}

async fn run_submit(settings: &Settings, args: &SubmitArgs) -> Result<(), AppError> {
    let snapshot = files::read_snapshot(&args.snapshot)?;
    let service = print_service(settings)?;

    let sink: Box<dyn DocumentSink> = match args.output.as_ref() {
        Some(path) => Box::new(FileSink::new(service.backend().clone(), path.clone())),
        None => Box::new(LinkSink),
    };

    let outcome = service.print(&snapshot, sink.as_ref(), shutdown_signal()).await?;
    info!(
        app_id = outcome.app_id,
        polls = outcome.polls,
        "print finished"
    );

    match outcome.delivery {
        Delivery::Saved { path, .. } => println!("{}", path.display()),
        Delivery::Linked { url } => println!("{url}"),
    }
    Ok(())
}

fn list_layouts() {
    for layout in Layout::ALL {
        println!("{}\t{}", layout.selector(), layout.app_id());
    }
}

fn print_service(settings: &Settings) -> Result<PrintService<PrintClient, TokioClock>, AppError> {
    let catalog = files::tile_catalog(settings.layers.tile_catalog_file.as_deref())?;
    let client = PrintClient::new(settings.print.origin.as_str(), settings.print.body_encoding)
        .map_err(|err| InfraError::client(err.to_string()))?;

    let profile = PrintProfile {
        catalog,
        transform: settings.layers.transform.clone(),
        overview: settings.overview,
        poll: settings.poll,
    };
    Ok(PrintService::new(client, TokioClock, profile))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for Ctrl+C; cancellation disabled");
        std::future::pending::<()>().await;
    }
    info!("cancellation requested");
}
