use crate::{
    cli::{Command, FormatArgs, StreamArgs},
    error::{
        Result,
        error::{ConvertSnafu, InvalidSubscriptionSnafu, PersistSnafu},
    },
    session::{SessionSummary, StreamSession},
    settings::Settings,
    sink::JsonLinesSink,
};
use ais_core::{
    BoundingBox, SubscriptionBuilder, SubscriptionRequest, geojson, read_batch, table,
};
use snafu::ResultExt;
use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};
use tracing::{info, instrument};

pub struct App {
    settings: Settings,
}

impl App {
    pub fn build(settings: Settings) -> App {
        App { settings }
    }

    pub async fn run(&self, command: Command) -> Result<()> {
        match command {
            Command::Stream(args) => self.stream(args).await.map(|_| ()),
            Command::Format(args) => self.format(args),
        }
    }

    /// Streams reports into `<outpath>.json` until the limit is reached or the upstream closes.
    #[instrument(skip_all)]
    pub async fn stream(&self, args: StreamArgs) -> Result<SessionSummary> {
        let request = subscription_request(self.settings.api_key()?, &args)?;
        if let Some(ids) = request.vessel_ids() {
            info!("searching mmsis: {ids:?}");
        } else {
            info!("searching bbox: {:?}", request.bounding_box());
        }

        let destination = with_extension(&args.outpath, "json");
        create_parent_dir(&destination).await?;
        let mut sink = JsonLinesSink::new(&destination);

        let summary = StreamSession::open(&self.settings.endpoint, &request)
            .await?
            .with_limit(args.limit)
            .run(&mut sink)
            .await?;

        info!(
            "downloaded {} message(s) to {}, upstream errors: {}, skipped frames: {}",
            summary.accepted,
            destination.display(),
            summary.server_errors,
            summary.skipped
        );

        Ok(summary)
    }

    /// Converts a persisted batch into `<outpath>.geojson` and `<outpath>.csv`.
    #[instrument(skip_all)]
    pub fn format(&self, args: FormatArgs) -> Result<()> {
        let reports = read_batch(&args.inpath).context(ConvertSnafu {
            stage: "reading the persisted batch",
        })?;

        if let Some(parent) = args.outpath.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(ais_core::Error::from)
                .context(ConvertSnafu {
                    stage: "creating the output directory",
                })?;
        }

        let collection = geojson::transform(&reports, args.trackline).context(ConvertSnafu {
            stage: "converting to geojson",
        })?;
        let geojson_path = with_extension(&args.outpath, "geojson");
        geojson::write_feature_collection(&geojson_path, &collection).context(ConvertSnafu {
            stage: "writing geojson",
        })?;

        let table = table::export(&reports).context(ConvertSnafu {
            stage: "flattening reports to a table",
        })?;
        let csv_path = with_extension(&args.outpath, "csv");
        table.write_csv_file(&csv_path).context(ConvertSnafu {
            stage: "writing csv",
        })?;

        info!(
            "wrote {} feature(s) to {} and {} row(s) to {}",
            collection.features.len(),
            geojson_path.display(),
            table.len(),
            csv_path.display()
        );

        Ok(())
    }
}

/// Builds the request for either `--mmsi` or `--north-west`/`--south-east`.
pub fn subscription_request(api_key: &str, args: &StreamArgs) -> Result<SubscriptionRequest> {
    let mut builder =
        SubscriptionBuilder::new(api_key).position_reports_only(args.positions_only);

    if let Some(mmsi) = &args.mmsi {
        builder = builder.vessel_ids_str(mmsi);
    }
    if let (Some(north_west), Some(south_east)) = (args.north_west, args.south_east) {
        builder = builder.bounding_box(BoundingBox::new(north_west, south_east));
    }

    builder.build().context(InvalidSubscriptionSnafu)
}

/// Appends `.extension` to the full path, `data.v1` becomes `data.v1.json`.
fn with_extension(path: &Path, extension: &str) -> PathBuf {
    let mut path = OsString::from(path);
    path.push(".");
    path.push(extension);
    PathBuf::from(path)
}

async fn create_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => tokio::fs::create_dir_all(parent)
            .await
            .context(PersistSnafu { path: parent }),
        _ => Ok(()),
    }
}
