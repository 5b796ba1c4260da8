//! CLI runner - executes commands

use crate::checkpoint::CheckpointStore;
use crate::cli::commands::{Cli, Commands, FetchArgs, OutputFormat};
use crate::dedup::DedupConfig;
use crate::error::{Error, Result};
use crate::fetch::{HttpFetcher, HttpFetcherConfig};
use crate::paginator::{Paginator, PaginatorConfig};
use crate::retry::RetryConfig;
use crate::types::{JsonValue, OptionStringExt, QueryOptions, SortDirection};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Fetch(args) => self.fetch(args).await,
            Commands::Inspect { checkpoint } => self.inspect(checkpoint).await,
        }
    }

    /// Stream an endpoint's items to stdout
    async fn fetch(&self, args: &FetchArgs) -> Result<()> {
        let fetcher = Arc::new(HttpFetcher::with_config(Self::build_fetcher_config(args)?));

        let mut config = PaginatorConfig::new()
            .with_page(args.page)
            .with_per_page(args.per_page)
            .with_options(Self::build_options(args)?)
            .with_save_interval(args.save_interval)
            .with_resume(!args.no_resume)
            .with_dedup(Self::build_dedup(args))
            .with_retry(
                RetryConfig::builder()
                    .max_retries(args.max_retries)
                    .build(),
            );
        if let Some(path) = &args.checkpoint {
            config = config.with_checkpoint_path(path);
        }

        let mut paginator = Paginator::new(&args.endpoint, config, fetcher);

        let mut emitted = 0u64;
        while let Some(item) = paginator.next_item().await? {
            self.output_message(&item);
            emitted += 1;
            if args.max_items.is_some_and(|max| emitted >= max) {
                // Record the early stop so a later run picks up here.
                if args.checkpoint.is_some() {
                    paginator.save_checkpoint().await?;
                }
                break;
            }
        }

        info!(
            "Fetched {} items from {} in {} pages",
            emitted,
            args.endpoint,
            paginator.pages_fetched()
        );
        Ok(())
    }

    /// Show the progress recorded in a checkpoint file
    async fn inspect(&self, path: &Path) -> Result<()> {
        let checkpoint = CheckpointStore::new(path).read().await?;
        self.output_message(&serde_json::to_value(&checkpoint)?);
        Ok(())
    }

    /// Translate fetch flags into query options.
    ///
    /// Empty flag values count as not set, so `--since "$SINCE"` with an
    /// unset shell variable does not send an empty filter.
    fn build_options(args: &FetchArgs) -> Result<QueryOptions> {
        let mut options = QueryOptions::default();
        if let Some(since) = args.since.clone().none_if_empty() {
            options = options.with_since(since);
        }
        if let Some(until) = args.until.clone().none_if_empty() {
            options = options.with_until(until);
        }
        if let Some(sort) = args.sort.clone().none_if_empty() {
            options = options.with_sort(sort);
        }
        if let Some(direction) = args.direction.clone().none_if_empty() {
            let direction = match direction.to_lowercase().as_str() {
                "asc" | "ascending" => SortDirection::Asc,
                "desc" | "descending" => SortDirection::Desc,
                other => {
                    return Err(Error::config(format!("Unknown sort direction: {other}")));
                }
            };
            options = options.with_direction(direction);
        }
        Ok(options)
    }

    /// Translate fetch flags into dedup configuration.
    ///
    /// `--no-dedup` and an empty `--dedup-field` both switch filtering off.
    fn build_dedup(args: &FetchArgs) -> DedupConfig {
        match args.dedup_field.clone().none_if_empty() {
            Some(field) if !args.no_dedup => DedupConfig::default().with_key_field(field),
            _ => DedupConfig::disabled(),
        }
    }

    /// Translate fetch flags into transport configuration
    fn build_fetcher_config(args: &FetchArgs) -> Result<HttpFetcherConfig> {
        let mut builder = HttpFetcherConfig::builder();
        if let Some(base_url) = &args.base_url {
            builder = builder.base_url(base_url.as_str());
        }
        if let Some(field) = &args.items_field {
            builder = builder.items_field(field.as_str());
        }
        if let Some(rps) = args.requests_per_second {
            builder = builder.requests_per_second(rps);
        }
        for header in &args.headers {
            let (key, value) = header.split_once('=').ok_or_else(|| {
                Error::config(format!("Invalid header (expected KEY=VALUE): {header}"))
            })?;
            builder = builder.header(key, value);
        }
        Ok(builder.build())
    }

    /// Output a message
    fn output_message(&self, msg: &JsonValue) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetch_args() -> FetchArgs {
        FetchArgs {
            endpoint: "/widgets".to_string(),
            base_url: None,
            page: 1,
            per_page: 30,
            since: None,
            until: None,
            sort: None,
            direction: None,
            checkpoint: None,
            save_interval: 100,
            no_resume: false,
            no_dedup: false,
            dedup_field: "id".to_string(),
            max_retries: 3,
            items_field: None,
            headers: Vec::new(),
            requests_per_second: None,
            max_items: None,
        }
    }

    #[test]
    fn test_build_options_forwards_set_flags() {
        let mut args = fetch_args();
        args.since = Some("2024-01-01T00:00:00Z".to_string());
        args.sort = Some("created".to_string());
        args.direction = Some("DESC".to_string());

        let options = Runner::build_options(&args).unwrap();
        assert_eq!(options.since.as_deref(), Some("2024-01-01T00:00:00Z"));
        assert_eq!(options.sort.as_deref(), Some("created"));
        assert_eq!(options.direction, Some(SortDirection::Desc));
    }

    #[test]
    fn test_build_options_treats_empty_flags_as_unset() {
        let mut args = fetch_args();
        args.since = Some(String::new());
        args.until = Some(String::new());
        args.sort = Some(String::new());
        args.direction = Some(String::new());

        let options = Runner::build_options(&args).unwrap();
        assert!(options.is_empty());
    }

    #[test]
    fn test_build_options_rejects_unknown_direction() {
        let mut args = fetch_args();
        args.direction = Some("sideways".to_string());

        let err = Runner::build_options(&args).unwrap_err();
        assert!(err.to_string().contains("sideways"));
    }

    #[test]
    fn test_build_dedup_uses_field_flag() {
        let mut args = fetch_args();
        args.dedup_field = "sku".to_string();

        let dedup = Runner::build_dedup(&args);
        assert!(dedup.enabled);
        assert_eq!(dedup.key_field, "sku");
    }

    #[test]
    fn test_build_dedup_disabled_by_flag_or_empty_field() {
        let mut args = fetch_args();
        args.no_dedup = true;
        assert!(!Runner::build_dedup(&args).enabled);

        let mut args = fetch_args();
        args.dedup_field = String::new();
        assert!(!Runner::build_dedup(&args).enabled);
    }
}
