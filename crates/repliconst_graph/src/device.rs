use std::{fmt, str::FromStr};

pub const CPU: &str = "CPU";
pub const GPU: &str = "GPU";

/// Structured form of a device name such as `/job:worker/replica:0/task:1/device:GPU:3`.
///
/// Every component is optional; a `None` component is either absent or a `*` wildcard.
/// Legacy names like `/cpu:0` and `/gpu:1` are accepted and normalised to upper case types.
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct DeviceName {
    pub job: Option<String>,
    pub replica: Option<u32>,
    pub task: Option<u32>,
    pub device_type: Option<String>,
    pub id: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceNameError(pub String);

impl fmt::Display for DeviceNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "could not parse device name `{}`", self.0)
    }
}

impl std::error::Error for DeviceNameError {}

impl DeviceName {
    pub fn new(job: &str, replica: u32, task: u32, device_type: &str, id: u32) -> Self {
        Self {
            job: Some(job.to_string()),
            replica: Some(replica),
            task: Some(task),
            device_type: Some(device_type.to_string()),
            id: Some(id),
        }
    }

    pub fn is_cpu(&self) -> bool {
        self.device_type.as_deref() == Some(CPU)
    }

    /// Devices on the same host share job, replica and task.
    pub fn same_host(&self, other: &Self) -> bool {
        self.job == other.job && self.replica == other.replica && self.task == other.task
    }

    /// The first CPU device on the host of `self`.
    pub fn to_cpu_on_same_host(&self) -> Self {
        Self { device_type: Some(CPU.to_string()), id: Some(0), ..self.clone() }
    }
}

/// Maps any device name to the name of the CPU device on the same host.
pub fn device_name_to_cpu_device_name(name: &str) -> Result<String, DeviceNameError> {
    name.parse::<DeviceName>().map(|device| device.to_cpu_on_same_host().to_string())
}

fn wildcard<T>(value: &str, parse: impl FnOnce(&str) -> Option<T>) -> Option<Option<T>> {
    if value == "*" {
        Some(None)
    } else {
        parse(value).map(Some)
    }
}

fn parse_number(value: &str) -> Option<u32> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    value.parse().ok()
}

fn parse_identifier(value: &str) -> Option<String> {
    let mut chars = value.chars();
    let first = chars.next()?;

    (first.is_ascii_alphabetic() && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')).then(|| value.to_string())
}

impl FromStr for DeviceName {
    type Err = DeviceNameError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let err = || DeviceNameError(name.to_string());

        let mut parsed = Self::default();

        if name.is_empty() {
            return Ok(parsed);
        }

        let rest = name.strip_prefix('/').ok_or_else(err)?;

        if rest.is_empty() {
            return Ok(parsed);
        }

        for component in rest.split('/') {
            let parts = component.split(':').collect::<Vec<_>>();

            match parts[..] {
                ["job", job] => parsed.job = wildcard(job, parse_identifier).ok_or_else(err)?,
                ["replica", replica] => parsed.replica = wildcard(replica, parse_number).ok_or_else(err)?,
                ["task", task] => parsed.task = wildcard(task, parse_number).ok_or_else(err)?,
                ["device", ty] => {
                    parsed.device_type = wildcard(ty, parse_identifier).ok_or_else(err)?;
                    parsed.id = None;
                }
                ["device", ty, id] => {
                    parsed.device_type = wildcard(ty, parse_identifier).ok_or_else(err)?;
                    parsed.id = wildcard(id, parse_number).ok_or_else(err)?;
                }
                [legacy, id] if legacy.eq_ignore_ascii_case(CPU) || legacy.eq_ignore_ascii_case(GPU) => {
                    parsed.device_type = Some(legacy.to_ascii_uppercase());
                    parsed.id = wildcard(id, parse_number).ok_or_else(err)?;
                }
                _ => return Err(err()),
            }
        }

        Ok(parsed)
    }
}

impl fmt::Display for DeviceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(job) = &self.job {
            write!(f, "/job:{job}")?;
        }

        if let Some(replica) = self.replica {
            write!(f, "/replica:{replica}")?;
        }

        if let Some(task) = self.task {
            write!(f, "/task:{task}")?;
        }

        match (&self.device_type, self.id) {
            (Some(ty), Some(id)) => write!(f, "/device:{ty}:{id}"),
            (Some(ty), None) => write!(f, "/device:{ty}:*"),
            (None, Some(id)) => write!(f, "/device:*:{id}"),
            (None, None) => Ok(()),
        }
    }
}
