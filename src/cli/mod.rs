//! Command line surface

use crate::registry::EcrSession;
use crate::retag::state::Stage;
use crate::retag::{self, RetagRequest};
use clap::Parser;
use tracing::debug;

/// A helper CLI for retagging ECR images, i.e. moving the 'latest' tag from image A to image B
#[derive(Parser, Debug)]
#[command(name = crate::APP_NAME)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The tag name that will be dropped from current images and applied to --new-image-digest
    #[arg(short = 't', long)]
    pub tag_name: String,

    /// The new image digest that will receive the --tag-name
    #[arg(short = 'd', long)]
    pub new_image_digest: String,

    /// The AWS profile name from the ~/.aws/credentials file
    #[arg(short, long)]
    pub profile: String,

    /// The AWS region where the ECR repo is located
    #[arg(short, long)]
    pub region: String,

    /// The AWS ECR repo name containing the images
    #[arg(short, long)]
    pub ecr_repo: String,
}

impl Cli {
    /// Validate the parsed flags into a retag request
    pub fn into_request(self) -> crate::Result<RetagRequest> {
        RetagRequest::new(
            self.tag_name,
            self.new_image_digest,
            self.profile,
            self.region,
            self.ecr_repo,
        )
    }
}

/// Process exit code for a failed parse
///
/// Usage errors exit 1 like every other failure. Help and version output exit 0.
pub fn exit_code(err: &clap::Error) -> i32 {
    if err.use_stderr() {
        1
    } else {
        0
    }
}

/// Run a retag for the parsed command line
pub async fn execute(cli: Cli) -> anyhow::Result<()> {
    let request = cli.into_request()?;

    let session = EcrSession::connect(&request.session_config()).await;
    debug!(stage = %Stage::SessionReady, "session created");

    let outcome = retag::retag(&session, &request).await?;

    println!();
    println!("{}", outcome.report());
    debug!(
        from = %outcome.stage,
        to = %outcome.stage.next().unwrap_or(Stage::Reported),
        tag = request.tag(),
        digest = request.digest(),
        "retag complete"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RetagError;
    use clap::error::ErrorKind;
    use clap::CommandFactory;

    const FULL: [&str; 11] = [
        "ecr-image-retag",
        "--tag-name",
        "latest",
        "--new-image-digest",
        "sha256:abc",
        "--profile",
        "default",
        "--region",
        "us-east-1",
        "--ecr-repo",
        "myapp",
    ];

    #[test]
    fn test_command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_command_name() {
        assert_eq!(Cli::command().get_name(), crate::APP_NAME);
    }

    #[test]
    fn test_exit_codes() {
        let missing = Cli::try_parse_from(FULL[..9].to_vec()).unwrap_err();
        assert_eq!(exit_code(&missing), 1);

        let unknown = Cli::try_parse_from(["ecr-image-retag", "--force"]).unwrap_err();
        assert_eq!(exit_code(&unknown), 1);

        let help = Cli::try_parse_from(["ecr-image-retag", "--help"]).unwrap_err();
        assert_eq!(help.kind(), ErrorKind::DisplayHelp);
        assert_eq!(exit_code(&help), 0);

        let version = Cli::try_parse_from(["ecr-image-retag", "--version"]).unwrap_err();
        assert_eq!(version.kind(), ErrorKind::DisplayVersion);
        assert_eq!(exit_code(&version), 0);
    }

    #[test]
    fn test_parse_long_flags() {
        let cli = Cli::try_parse_from(FULL).unwrap();
        assert_eq!(cli.tag_name, "latest");
        assert_eq!(cli.new_image_digest, "sha256:abc");
        assert_eq!(cli.profile, "default");
        assert_eq!(cli.region, "us-east-1");
        assert_eq!(cli.ecr_repo, "myapp");
    }

    #[test]
    fn test_parse_short_flags() {
        let cli = Cli::try_parse_from([
            "ecr-image-retag", "-t", "v2", "-d", "sha256:def", "-p", "ci", "-r", "eu-west-1",
            "-e", "api",
        ])
        .unwrap();

        let request = cli.into_request().unwrap();
        assert_eq!(request.tag(), "v2");
        assert_eq!(request.digest(), "sha256:def");
        assert_eq!(request.repository(), "api");
        assert_eq!(request.session_config().region, "eu-west-1");
    }

    #[test]
    fn test_each_flag_is_required() {
        // Drop one flag/value pair at a time.
        for skip in (1..FULL.len()).step_by(2) {
            let args: Vec<&str> = FULL
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != skip && *i != skip + 1)
                .map(|(_, arg)| *arg)
                .collect();

            let err = Cli::try_parse_from(args).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument, "without {}", FULL[skip]);
        }
    }

    #[test]
    fn test_empty_value_is_rejected() {
        let mut args = FULL;
        args[10] = "";

        let cli = Cli::try_parse_from(args).unwrap();
        assert!(matches!(
            cli.into_request(),
            Err(RetagError::MissingInput("ecr-repo"))
        ));
    }

    #[tokio::test]
    async fn test_execute_rejects_empty_value_before_connecting() {
        let mut args = FULL;
        args[2] = "";

        let cli = Cli::try_parse_from(args).unwrap();
        let err = execute(cli).await.unwrap_err();
        assert!(err.to_string().contains("--tag-name"));
    }
}
