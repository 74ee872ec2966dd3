//! Command handlers
//!
//! One function per subcommand. [`HandlerContext`] carries what every
//! handler needs: resolved configuration and the output writer.

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use engine_client::{EngineApi, HttpEngine};
use serde::Serialize;

use crate::cli::Repl;
use crate::config::DiskctlConfig;
use crate::error::ClientError;
use crate::listing::ListingView;
use crate::output::{OutputEvent, OutputWriter};
use crate::render;
use crate::workbench::{Update, Workbench};

/// Shared context for command handlers
pub struct HandlerContext {
    pub config: DiskctlConfig,
    pub output: Box<dyn OutputWriter>,
    /// Print listings as JSON instead of text
    pub json: bool,
}

/// Credentials for authenticating before a batch
pub struct Credentials {
    pub user: String,
    pub pass: String,
    pub id: String,
}

impl HandlerContext {
    pub fn new(config: DiskctlConfig, output: Box<dyn OutputWriter>) -> Self {
        Self {
            config,
            output,
            json: false,
        }
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// HTTP engine built from the configuration
    pub fn engine(&self) -> Result<Arc<dyn EngineApi>> {
        let engine = HttpEngine::with_timeout(&self.config.engine.url, self.config.engine.timeout())
            .with_context(|| format!("Invalid engine URL: {}", self.config.engine.url))?;
        tracing::debug!(url = %engine.base_url(), "engine configured");
        Ok(Arc::new(engine))
    }

    fn emit(&self, events: Vec<OutputEvent>) {
        for event in events {
            self.output.write(event);
        }
        self.output.flush();
    }

    /// Print fetched items, as JSON or through `render`
    fn show<T: Serialize>(&self, items: &[T], render: impl FnOnce(&[T]) -> Vec<OutputEvent>) -> Result<()> {
        if self.json {
            let json = serde_json::to_string_pretty(items).context("Failed to encode listing")?;
            self.emit(vec![OutputEvent::Text(json)]);
        } else {
            self.emit(render(items));
        }
        Ok(())
    }
}

/// Handle the `shell` command - interactive console
pub async fn shell(ctx: &HandlerContext) -> Result<()> {
    let (workbench, mut events) = Workbench::new(ctx.engine()?);
    ctx.output.write(OutputEvent::System(format!(
        "Engine: {}",
        ctx.config.engine.url
    )));

    let mut repl = Repl::new(workbench, ctx.output.as_ref());
    repl.run(&mut events).await
}

/// Handle the `exec` command - gate and submit one batch
///
/// The batch comes from `text`, else from `file`, else from stdin.
pub async fn exec(
    ctx: &HandlerContext,
    text: Option<String>,
    file: Option<&Path>,
    credentials: Option<Credentials>,
) -> Result<()> {
    let (mut workbench, mut events) = Workbench::new(ctx.engine()?);

    if let Some(creds) = credentials {
        workbench.login(&creds.user, &creds.pass, &creds.id)?;
        for update in workbench.settle(&mut events).await {
            if let Update::Login { result: Err(err), .. } = update {
                return Err(err.into());
            }
        }
    }

    match (text, file) {
        (Some(text), _) => workbench.console_mut().set_input(text),
        (None, Some(path)) => {
            workbench.console_mut().load_file(path)?;
        }
        (None, None) => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read commands from stdin")?;
            workbench.console_mut().set_input(buffer);
        }
    }

    workbench.execute_input()?;
    let mut failure: Option<ClientError> = None;
    for update in workbench.settle(&mut events).await {
        match update {
            Update::Executed { result: Ok(text), .. } => ctx.emit(vec![OutputEvent::Engine(text)]),
            Update::Executed { result: Err(err), .. } => failure = Some(err),
            _ => {}
        }
    }

    match failure {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

/// Handle the `login` command - authenticate and print the engine's answer
pub async fn login(ctx: &HandlerContext, creds: Credentials) -> Result<()> {
    let (mut workbench, mut events) = Workbench::new(ctx.engine()?);
    workbench.login(&creds.user, &creds.pass, &creds.id)?;

    for update in workbench.settle(&mut events).await {
        match update {
            Update::Login { result: Ok(text), user } => ctx.emit(vec![
                OutputEvent::Engine(text),
                OutputEvent::Status(format!("logged in as {}", user)),
            ]),
            Update::Login { result: Err(err), .. } => return Err(err.into()),
            _ => {}
        }
    }
    Ok(())
}

/// Handle the `disks` command
pub async fn disks(ctx: &HandlerContext) -> Result<()> {
    let disks = ctx
        .engine()?
        .list_disks()
        .await
        .map_err(ClientError::from)?;
    ctx.show(&disks, |items| render::disks(ListingView::of(items), None))
}

/// Handle the `partitions` command
pub async fn partitions(ctx: &HandlerContext, disk_path: &str) -> Result<()> {
    let partitions = ctx
        .engine()?
        .list_partitions(disk_path)
        .await
        .map_err(ClientError::from)?;
    ctx.show(&partitions, |items| {
        render::partition_list(
            format!("Partitions of {}", disk_path),
            ListingView::of(items),
            None,
        )
    })
}

/// Handle the `ls` command
pub async fn ls(ctx: &HandlerContext, partition_id: &str, path: &str) -> Result<()> {
    if !path.starts_with('/') {
        bail!("Path must be absolute: {}", path);
    }
    let entries = ctx
        .engine()?
        .list_directory(partition_id, path)
        .await
        .map_err(ClientError::from)?;
    ctx.show(&entries, |items| {
        render::entries(format!("{}:{}", partition_id, path), ListingView::of(items))
    })
}

/// Handle the `journal` command
pub async fn journal(ctx: &HandlerContext, partition_id: &str) -> Result<()> {
    let entries = ctx
        .engine()?
        .list_journal(partition_id)
        .await
        .map_err(ClientError::from)?;
    ctx.show(&entries, |items| render::journal(partition_id, ListingView::of(items)))
}
