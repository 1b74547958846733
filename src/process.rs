use sysinfo::{ProcessRefreshKind, ProcessesToUpdate, System};

/// Lowest pid whose executable name is exactly `exe_name`.
///
/// The comparison is case-sensitive; names are taken as the OS reports them.
pub fn first_matching_pid<I, S>(processes: I, exe_name: &str) -> Option<u32>
where
    I: IntoIterator<Item = (u32, S)>,
    S: AsRef<str>,
{
    processes
        .into_iter()
        .filter(|(_, name)| name.as_ref() == exe_name)
        .map(|(pid, _)| pid)
        .min()
}

/// Look up a running process by executable file name.
pub fn find_process_id(exe_name: &str) -> Option<u32> {
    if exe_name.is_empty() {
        return None;
    }
    let mut system = System::new();
    system.refresh_processes_specifics(ProcessesToUpdate::All, true, ProcessRefreshKind::nothing());
    let pid = first_matching_pid(
        system
            .processes()
            .values()
            .map(|p| (p.pid().as_u32(), p.name().to_string_lossy().to_string())),
        exe_name,
    );
    tracing::debug!(exe_name, ?pid, "process lookup");
    pid
}
