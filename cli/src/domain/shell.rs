//! Structured shell commands: a program plus an argument list, never an
//! interpolated string.

/// Which account a command runs under on the target host.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RunAs {
    /// The account we connect as.
    #[default]
    Operator,
    /// Another account, through `sudo -u <user> -H`.
    User(String),
    /// Root, through `sudo`.
    Root,
}

/// What a non-zero exit means for the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnFailure {
    /// Abort the workflow.
    #[default]
    Abort,
    /// Log a warning and carry on (cleanup commands).
    Warn,
}

/// A command to run locally or on the provisioning host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCommand {
    pub program: String,
    pub args: Vec<String>,
    pub run_as: RunAs,
    pub stdin: Option<Vec<u8>>,
    pub on_failure: OnFailure,
}

impl ShellCommand {
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            run_as: RunAs::Operator,
            stdin: None,
            on_failure: OnFailure::Abort,
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn as_user(mut self, user: impl Into<String>) -> Self {
        self.run_as = RunAs::User(user.into());
        self
    }

    #[must_use]
    pub fn as_root(mut self) -> Self {
        self.run_as = RunAs::Root;
        self
    }

    #[must_use]
    pub fn stdin(mut self, input: impl Into<Vec<u8>>) -> Self {
        self.stdin = Some(input.into());
        self
    }

    /// Mark as cleanup: failure is reported, not fatal.
    #[must_use]
    pub fn best_effort(mut self) -> Self {
        self.on_failure = OnFailure::Warn;
        self
    }

    /// Full argv including the privilege prefix.
    #[must_use]
    pub fn argv(&self) -> Vec<String> {
        let mut argv = match &self.run_as {
            RunAs::Operator => Vec::new(),
            RunAs::User(user) => vec![
                "sudo".to_string(),
                "-u".to_string(),
                user.clone(),
                "-H".to_string(),
                "--".to_string(),
            ],
            RunAs::Root => vec!["sudo".to_string(), "--".to_string()],
        };
        argv.push(self.program.clone());
        argv.extend(self.args.iter().cloned());
        argv
    }

    /// Human-readable form for logs and error messages.
    #[must_use]
    pub fn display(&self) -> String {
        let argv = self.argv();
        shlex::try_join(argv.iter().map(String::as_str)).unwrap_or_else(|_| argv.join(" "))
    }
}
