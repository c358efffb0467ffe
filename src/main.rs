//! `pathkit` command line tool
//!
//! - `pathkit time <project>` - print the timeline and total time
//! - `pathkit analyze <project> --segment N` - statistics for one segment
//! - `pathkit optimize <project>` - search for a faster collision-free path
//!
//! Results go to stdout as JSON, logs go to stderr.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use pathkit::{
    analyze_segment, event_bus, init_logging, CollisionChecker, EventFilter, MotionProfiler, PathOptimizer,
    PlannerError, PlannerEvent, Project,
};

#[derive(Parser)]
#[command(name = "pathkit")]
#[command(about = "Motion profiling and path optimization for 2D wheeled robots", long_about = None)]
#[command(version = pathkit::VERSION, long_version = pathkit::LONG_VERSION)]
struct Cli {
    /// Engine configuration file (.json or .toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Profile the project and print its timeline
    Time {
        project: PathBuf,

        /// Print only the summary line
        #[arg(long)]
        summary: bool,
    },

    /// Print length and rotation statistics for one segment
    Analyze {
        project: PathBuf,

        /// Index of the segment in the project's segment list
        #[arg(long)]
        segment: usize,
    },

    /// Search for a faster collision-free path
    Optimize {
        project: PathBuf,

        /// Override the configured generation count
        #[arg(long)]
        generations: Option<usize>,

        /// Fix the random seed for a reproducible search
        #[arg(long)]
        seed: Option<u64>,

        /// Write the project with optimized segments here
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;
    let cli = Cli::parse();

    event_bus().subscribe(EventFilter::All, |event| {
        tracing::debug!("{}", event.description());
    });

    match cli.command {
        Commands::Time { project, summary } => {
            let project = Project::load(&project)?;
            let config = resolve_config(&project, cli.config.as_deref())?;
            time(&project, &config, summary)
        }
        Commands::Analyze { project, segment } => {
            let project = Project::load(&project)?;
            let config = resolve_config(&project, cli.config.as_deref())?;
            analyze(&project, &config, segment)
        }
        Commands::Optimize {
            project,
            generations,
            seed,
            output,
        } => {
            let loaded = Project::load(&project)?;
            let mut config = resolve_config(&loaded, cli.config.as_deref())?;
            if let Some(generations) = generations {
                config.optimizer.max_generations = generations;
            }
            if seed.is_some() {
                config.optimizer.seed = seed;
            }
            optimize(&loaded, &config, output).await
        }
    }
}

/// `--config` wins, then the project's own section, then the platform config file.
fn resolve_config(project: &Project, path: Option<&std::path::Path>) -> Result<pathkit::Config> {
    if let Some(path) = path {
        return pathkit::Config::load_from_file(path)
            .with_context(|| format!("loading config {}", path.display()));
    }
    if project.config.is_some() {
        return Ok(project.config());
    }
    match pathkit::Config::default_path() {
        Ok(path) if path.exists() => pathkit::Config::load_from_file(&path)
            .with_context(|| format!("loading config {}", path.display())),
        _ => Ok(pathkit::Config::default()),
    }
}

fn time(project: &Project, config: &pathkit::Config, summary: bool) -> Result<()> {
    let profiler = MotionProfiler::new(&project.settings, config.profiler.clone())?;
    let prediction = profiler.profile_path(&project.start_point, &project.segments, &project.sequence);

    for segment_id in &prediction.skipped_segments {
        event_bus().publish(PlannerEvent::SegmentSkipped {
            segment_id: segment_id.clone(),
            reason: "missing segment or end point".to_string(),
        });
    }
    event_bus().publish(PlannerEvent::TimelineComputed {
        total_time: prediction.total_time,
        total_distance: prediction.total_distance,
        events: prediction.timeline.len(),
    });

    let checker = CollisionChecker::new(
        config.collision.clone(),
        &project.settings,
        config.profiler.composite_steps,
    );
    let penalty = checker.path_penalty(
        &project.start_point,
        &project.segments,
        &project.sequence,
        &project.shapes,
    );

    if summary {
        println!(
            "{:.3}s over {:.2}in in {} events, collision penalty {}",
            prediction.total_time,
            prediction.total_distance,
            prediction.timeline.len(),
            penalty
        );
        return Ok(());
    }

    let report = serde_json::json!({
        "prediction": prediction,
        "markers": prediction.marker_times(),
        "collisionPenalty": penalty,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn analyze(project: &Project, config: &pathkit::Config, index: usize) -> Result<()> {
    let count = project.segments.len();
    let Some(segment) = project.segments.get(index) else {
        return Err(pathkit::Error::from(PlannerError::SegmentOutOfRange { index, count }).into());
    };
    let Some(end) = segment.end_point else {
        bail!("segment '{}' has no end point", segment.id);
    };

    // the robot arrives by travelling the earlier segments in list order
    let profiler = MotionProfiler::new(&project.settings, config.profiler.clone())?;
    let before = profiler.profile_path(&project.start_point, &project.segments[..index], &[]);
    let (start, start_heading) = match before.pose_at(before.total_time) {
        Some(pose) => (pose.point, pose.heading),
        None => (project.start_point.point(), project.start_point.heading),
    };

    let analysis = analyze_segment(
        start,
        &segment.control_points,
        end.point(),
        config.profiler.resolution,
        start_heading,
    );
    println!("{}", serde_json::to_string_pretty(&analysis)?);
    Ok(())
}

async fn optimize(project: &Project, config: &pathkit::Config, output: Option<PathBuf>) -> Result<()> {
    let optimizer = PathOptimizer::new(
        project.optimization_problem(),
        config.optimizer.clone(),
        config.profiler.clone(),
        config.collision.clone(),
    )?
    .with_event_bus(event_bus());

    let baseline = optimizer.baseline();
    let stop = optimizer.stop_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted, finishing the current generation");
            stop.store(true, std::sync::atomic::Ordering::SeqCst);
        }
    });

    let result = optimizer
        .optimize(|progress| {
            tracing::info!(
                "Generation {}: best {:.3}s (travel {:.3}s)",
                progress.generation,
                progress.best_fitness,
                progress.best_time
            );
        })
        .await?;

    if result.failed() {
        tracing::warn!("No collision-free path found; keeping the best colliding candidate");
    }
    println!(
        "{:.3}s -> {:.3}s after {} generations{}",
        baseline,
        result.best_time,
        result.generations,
        if result.stopped { " (stopped)" } else { "" }
    );

    if let Some(output) = output {
        project.with_segments(result.segments).save(&output)?;
        tracing::info!("Wrote {}", output.display());
    }
    Ok(())
}
