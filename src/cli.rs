//! CLI definitions for Variantsmith.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Variantsmith CLI.
#[derive(Parser)]
#[command(name = "variantsmith")]
#[command(about = "Generate browser-injectable CSS/JS A/B test variations")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (default: config/variantsmith.toml if present)
    #[arg(short, long, global = true, env = "VARIANTSMITH_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Page and request shared by the model-facing commands.
#[derive(Args)]
pub(crate) struct RequestArgs {
    /// Capture file: an element database, or `{database, screenshot}`
    #[arg(short, long)]
    pub page: PathBuf,

    /// Page URL the capture belongs to
    #[arg(long, default_value = "about:blank")]
    pub url: String,

    /// Selector of the element the user picked (narrows the search scope)
    #[arg(long)]
    pub selected: Option<String>,

    /// Variation spec as "Name: description" (repeatable)
    #[arg(long = "variation")]
    pub variations: Vec<String>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Print the generation prompt for a captured page
    Prompt {
        #[command(flatten)]
        request: RequestArgs,

        /// Natural-language change request
        description: String,
    },

    /// Generate variations for a captured page
    Generate {
        #[command(flatten)]
        request: RequestArgs,

        /// Natural-language change request
        description: String,

        /// Write the generated code to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Adjust previously applied code
    Adjust {
        #[command(flatten)]
        request: RequestArgs,

        /// Previously applied code (JSON)
        #[arg(long)]
        code: PathBuf,

        /// Feedback for this turn
        feedback: String,

        /// Test result (JSON) to fold in as mandatory fixes
        #[arg(long)]
        test_result: Option<PathBuf>,

        /// Write the merged code to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run the response parser on a saved model reply
    Parse {
        /// File holding the raw reply text
        file: PathBuf,
    },

    /// Check code selectors against a captured page
    Validate {
        /// Generated code (JSON)
        code: PathBuf,

        /// Capture file
        #[arg(short, long)]
        page: PathBuf,

        /// Repair generic selectors where the page allows it
        #[arg(long)]
        repair: bool,
    },

    /// Print the assembled in-page test script
    Harness {
        /// File holding the test source (defines `runTest`)
        test: PathBuf,
    },

    /// Visual QA of a before/after pair
    Qa {
        /// Before screenshot: data URL, image URL, or @file holding either
        #[arg(long)]
        before: String,

        /// After screenshot: data URL, image URL, or @file holding either
        #[arg(long)]
        after: String,

        /// The request the code was generated for
        #[arg(long)]
        request: String,

        /// Applied code (JSON)
        #[arg(long)]
        code: PathBuf,

        /// Behavioral test result (JSON)
        #[arg(long)]
        test_result: Option<PathBuf>,
    },

    /// Validate the configuration
    Check,
}
