//! Integration tests for the mixer over captured `pacmd` output
//!
//! These run the whole path from raw text through the parser and device model
//! to the commands issued back to the executor.

use volumecontrol_core::domain::device::DeviceError;
use volumecontrol_core::domain::parser::{parse, EMPTY_ITEM_ID};
use volumecontrol_core::domain::{Direction, ExecutorError, Mixer};
use volumecontrol_infra::PacmdExecutor;
use volumecontrol_tests::{
    RecordingExecutor, LIST_SINKS, LIST_SINKS_NO_DEFAULT, LIST_SINK_INPUTS,
    LIST_SINK_INPUTS_EMPTY,
};

fn fixture_mixer() -> Mixer<RecordingExecutor> {
    Mixer::new(RecordingExecutor::with_fixtures())
}

// ============================================================================
// PARSING
// ============================================================================

#[test]
fn test_parse_is_deterministic() {
    assert_eq!(parse(LIST_SINKS), parse(LIST_SINKS));
    assert_eq!(parse(LIST_SINK_INPUTS), parse(LIST_SINK_INPUTS));
}

#[test]
fn test_parse_real_sink_dump() {
    let list = parse(LIST_SINKS);

    assert_eq!(list.ids().collect::<Vec<_>>(), vec![0, 1]);
    assert_eq!(list.active_id(), Some(1));

    let analog = list.get(1).unwrap();
    assert_eq!(analog.scalar("state"), Some("RUNNING"));
    assert_eq!(analog.scalar("suspend cause"), Some(""));
    assert_eq!(analog.scalar("channel map"), Some("front-left,front-right"));
    assert_eq!(analog.scalar("active port"), Some("<analog-output-speaker>"));

    let props = analog.record("properties").unwrap();
    assert_eq!(props.scalar("alsa.card_name"), Some("HDA Intel PCH"));
    assert_eq!(
        props.keys().collect::<Vec<_>>(),
        vec![
            "alsa.resolution_bits",
            "device.api",
            "device.class",
            "alsa.card_name",
            "device.description",
            "device.icon_name",
        ]
    );

    let ports = analog.record("ports").unwrap();
    assert_eq!(ports.len(), 2);
    assert_eq!(
        ports.scalar("analog-output-headphones"),
        Some("Headphones (priority 9900, latency offset 0 usec, available: no)")
    );
}

#[test]
fn test_parse_empty_sink_inputs() {
    let list = parse(LIST_SINK_INPUTS_EMPTY);
    assert_eq!(list.ids().collect::<Vec<_>>(), vec![EMPTY_ITEM_ID]);
}

// ============================================================================
// DEVICE MODEL
// ============================================================================

#[test]
fn test_list_sinks() {
    let mixer = fixture_mixer();
    let sinks = mixer.list_sinks().unwrap();

    assert_eq!(sinks.len(), 2);
    assert_eq!(
        sinks.values().filter(|s| s.is_active).map(|s| s.id).collect::<Vec<_>>(),
        vec![1]
    );

    let hdmi = &sinks[&0];
    assert_eq!(
        hdmi.name,
        "GP107GL High Definition Audio Controller Digital Stereo (HDMI)"
    );
    assert!(!hdmi.muted);
    assert_eq!(hdmi.max_volume, 65536);
    assert_eq!(hdmi.global_volume(), 45875);
    assert_eq!(hdmi.global_percent(), 69);

    let analog = &sinks[&1];
    assert_eq!(analog.name, "Built-in Audio Analog Stereo");
    assert!(analog.muted);
    let names: Vec<_> = analog.channels.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["front-left", "front-right"]);
    assert_eq!(analog.channels[1].percent, 30);
    assert_eq!(analog.global_volume(), 26214);
    assert_eq!(analog.global_percent(), 39);
}

#[test]
fn test_global_percent_repeatable() {
    let sink = fixture_mixer().active_sink().unwrap();
    assert_eq!(sink.global_percent(), sink.global_percent());
}

#[test]
fn test_list_applications() {
    let mixer = fixture_mixer();
    let apps = mixer.list_applications().unwrap();

    assert_eq!(apps.len(), 2);
    assert_eq!(apps[&17].name, "Firefox");
    assert_eq!(apps[&17].sink_id, 1);
    assert_eq!(apps[&23].name, "mpv Media Player");
    assert_eq!(apps[&23].sink_id, 0);
}

#[test]
fn test_no_applications() {
    let mixer = Mixer::new(
        RecordingExecutor::with_fixtures().respond("list-sink-inputs", LIST_SINK_INPUTS_EMPTY),
    );
    assert!(mixer.list_applications().unwrap().is_empty());
}

#[test]
fn test_no_active_sink() {
    let mixer = Mixer::new(RecordingExecutor::new().respond("list-sinks", LIST_SINKS_NO_DEFAULT));
    assert!(matches!(mixer.active_sink(), Err(DeviceError::NoActiveSink)));
    assert_eq!(mixer.list_sinks().unwrap().len(), 1);
}

// ============================================================================
// MUTATIONS
// ============================================================================

#[test]
fn test_volume_up_from_loudest_channel() {
    let mixer = fixture_mixer();
    let adjustment = mixer.volume_up(1).unwrap();

    assert_eq!(adjustment.direction, Direction::Up);
    assert_eq!(adjustment.current, 26214);
    assert_eq!(adjustment.step, 655);
    assert_eq!(adjustment.result, 26869);
    assert_eq!(mixer.executor().mutations(), vec!["set-sink-volume 1 26869"]);
}

#[test]
fn test_volume_down() {
    let mixer = fixture_mixer();
    let adjustment = mixer.volume_down(0).unwrap();

    assert_eq!(adjustment.result, 45875 - 655);
    assert_eq!(mixer.executor().mutations(), vec!["set-sink-volume 0 45220"]);
}

#[test]
fn test_each_adjustment_requeries() {
    let mixer = fixture_mixer();
    mixer.volume_up(1).unwrap();
    mixer.volume_up(1).unwrap();

    // The fixture does not change, so both steps start from the same level
    assert_eq!(
        mixer.executor().issued(),
        vec![
            "list-sinks",
            "set-sink-volume 1 26869",
            "list-sinks",
            "set-sink-volume 1 26869",
        ]
    );
}

#[test]
fn test_toggle_mute_muted_sink() {
    let mixer = fixture_mixer();
    assert!(!mixer.toggle_mute(1).unwrap());
    assert_eq!(mixer.executor().mutations(), vec!["set-sink-mute 1 false"]);
}

#[test]
fn test_toggle_mute_unmuted_sink() {
    let mixer = fixture_mixer();
    assert!(mixer.toggle_mute(0).unwrap());
    assert_eq!(mixer.executor().mutations(), vec!["set-sink-mute 0 true"]);
}

#[test]
fn test_routing_commands() {
    let mixer = fixture_mixer();
    mixer.set_default_sink(0).unwrap();
    mixer.set_application_sink(17, 0).unwrap();
    mixer.set_sink_volume(1, 32768).unwrap();

    assert_eq!(
        mixer.executor().issued(),
        vec![
            "set-default-sink 0",
            "move-sink-input 17 0",
            "set-sink-volume 1 32768",
        ]
    );
}

#[test]
fn test_stale_application_sink() {
    let moved = LIST_SINK_INPUTS.replace("sink: 0 <", "sink: 5 <");
    let mixer = Mixer::new(RecordingExecutor::with_fixtures().respond("list-sink-inputs", &moved));

    let apps = mixer.list_applications().unwrap();
    let sinks = mixer.list_sinks().unwrap();

    // Routing is taken as reported even when the sink is gone
    assert_eq!(apps[&23].sink_id, 5);
    assert!(!sinks.contains_key(&apps[&23].sink_id));
}

// ============================================================================
// FAILURES
// ============================================================================

#[test]
fn test_executor_failure_is_propagated_without_retry() {
    let mixer = Mixer::new(RecordingExecutor::with_fixtures().failing("set-sink-volume"));

    let err = mixer.volume_up(1).unwrap_err();
    assert!(matches!(
        err,
        DeviceError::Executor(ExecutorError::NonZeroExit { .. })
    ));
    assert_eq!(mixer.executor().mutations(), vec!["set-sink-volume 1 26869"]);
}

#[test]
fn test_failed_query_issues_no_mutation() {
    let mixer = Mixer::new(RecordingExecutor::new());
    assert!(mixer.toggle_mute(1).is_err());
    assert!(mixer.executor().mutations().is_empty());
}

#[cfg(unix)]
#[test]
fn test_process_executor_failure() {
    let mixer = Mixer::new(PacmdExecutor::new("false"));
    assert!(matches!(
        mixer.list_sinks(),
        Err(DeviceError::Executor(ExecutorError::NonZeroExit { .. }))
    ));
}

#[cfg(unix)]
#[test]
fn test_process_executor_unparseable_output_yields_no_sinks() {
    // `echo` prints its arguments back, which contain no `index:` items
    let mixer = Mixer::new(PacmdExecutor::new("echo"));
    assert!(mixer.list_sinks().unwrap().is_empty());
}
