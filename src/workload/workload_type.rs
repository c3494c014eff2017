//! Task kind definitions

/// Supported unit-of-work kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    /// Blocking wait stand-in (timed sleep)
    Io,
    /// Computation stand-in (timed busy-loop)
    Cpu,
}

impl TaskKind {
    /// All kinds in the order they run by default
    pub const ALL: [TaskKind; 2] = [TaskKind::Io, TaskKind::Cpu];

    /// Parse task kind from string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "io" | "io-bound" | "io_bound" | "io_bound_task" => Some(Self::Io),
            "cpu" | "cpu-bound" | "cpu_bound" | "cpu_bound_task" => Some(Self::Cpu),
            _ => None,
        }
    }

    /// Short name, also used on the worker command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Io => "io",
            Self::Cpu => "cpu",
        }
    }

    /// Name of the task function for run headers
    pub fn task_name(&self) -> &'static str {
        match self {
            Self::Io => "io_bound_task",
            Self::Cpu => "cpu_bound_task",
        }
    }

    /// Banner title for the kind's section
    pub fn title(&self) -> &'static str {
        match self {
            Self::Io => "I/O-bound task test",
            Self::Cpu => "CPU-bound task test",
        }
    }
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
