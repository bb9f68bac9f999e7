use std::error::Error;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::info;
use tracing_subscriber::EnvFilter;

use overlay_scan::cli::{RecognizerBackend, parse_cli};
use overlay_scan::output::CsvOutput;
use overlay_scan::pipeline::{SampleObserver, run_extraction};
use overlay_scan::progress::ProgressReporter;
use overlay_scan::settings::resolve_settings;
use overlay_scan::table::post_process;
use overlay_scan::{
    Backend, Configuration, FrameError, NoopRecognizer, SamplingPlan, TextRecognizer,
};

fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();
    let (args, sources) = parse_cli();

    if args.list_backends {
        print_available_backends();
        return Ok(());
    }

    let mut settings = resolve_settings(&args, &sources)?;
    if settings.input.is_none() {
        settings.input = args.input.clone();
    }

    let mut config = Configuration::from_env().unwrap_or_default();
    if let Some(backend) = settings.backend.as_deref() {
        config.backend = Backend::from_str(backend)?;
    }
    if settings.input.is_some() {
        config.input = settings.input.clone();
    }

    let available = Configuration::available_backends();
    if available.is_empty() {
        return Err(FrameError::configuration(
            "no frame source backend available; rebuild with a backend feature such as \"backend-mock\"",
        )
        .into());
    }
    if !available.contains(&config.backend) {
        return Err(FrameError::unsupported(config.backend.as_str()).into());
    }

    let mut source = config.create_source()?;
    let fps = source.fps();
    let plan = SamplingPlan::new(
        fps,
        settings.sampling.start_time,
        settings.sampling.end_time,
        settings.sampling.interval_frames,
    )?;
    info!(
        backend = config.backend.as_str(),
        fps,
        start_time = settings.sampling.start_time,
        end_time = settings.sampling.end_time,
        interval = settings.sampling.interval_frames,
        regions = settings.regions.len(),
        "starting extraction"
    );

    let stop = Arc::new(AtomicBool::new(false));
    let stop_handle = Arc::clone(&stop);
    ctrlc::set_handler(move || {
        stop_handle.store(true, Ordering::Relaxed);
    })?;

    let recognizer = build_recognizer(args.recognizer);
    let mut progress = ProgressReporter::new(plan.expected_samples());

    let result = run_extraction(
        source.as_mut(),
        &plan,
        &settings.regions,
        recognizer.as_ref(),
        settings.extraction,
        Some(&mut progress as &mut dyn SampleObserver),
        &stop,
    );
    let mut table = match result {
        Ok(table) => table,
        Err(err) => {
            progress.abandon(&err.to_string());
            return Err(err.into());
        }
    };
    if stop.load(Ordering::Relaxed) {
        progress.abandon("interrupted");
    } else {
        progress.finish();
    }

    post_process(&mut table);

    let output = CsvOutput::new(&settings.output);
    output.write(&table)?;
    info!(
        samples = table.len(),
        path = %output.path().display(),
        "wrote result table"
    );
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_recognizer(choice: RecognizerBackend) -> Box<dyn TextRecognizer> {
    match choice {
        RecognizerBackend::Noop => Box::new(NoopRecognizer::default()),
        RecognizerBackend::Auto => {
            // No OCR engine is compiled in by default; the noop recognizer
            // keeps bar regions usable while leaving text columns empty.
            info!("no OCR engine compiled in; text regions will stay empty");
            Box::new(NoopRecognizer::default())
        }
    }
}

fn print_available_backends() {
    let names: Vec<&'static str> = Configuration::available_backends()
        .iter()
        .map(Backend::as_str)
        .collect();
    if names.is_empty() {
        println!("available backends: (none compiled)");
    } else {
        println!("available backends: {}", names.join(", "));
    }
}
