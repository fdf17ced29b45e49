use crate::config::SceneConfig;
use anyhow::Result;
use mrtouch_button::ButtonState;
use mrtouch_core::PointerId;
use mrtouch_interaction::{ButtonTarget, InteractionScene};
use mrtouch_math::{Pose, Quat, Vec3};
use mrtouch_pointer::{same_target, TouchPointer};
use mrtouch_testkit::{ButtonEvent, EventRecord, JsonlSink, PointerPath, RecordingHandler};
use std::rc::Rc;
use tracing::{info, warn};

/// Outcome of a run, per button.
#[derive(Debug, Clone, PartialEq)]
pub struct ButtonSummary {
    pub name: String,
    pub presses: usize,
    pub releases: usize,
    pub state: ButtonState,
}

#[derive(Debug, Default)]
pub struct ScenarioReport {
    pub frames: u64,
    pub events: usize,
    pub buttons: Vec<ButtonSummary>,
}

struct ScriptedButton {
    name: String,
    target: Rc<ButtonTarget>,
    recorder: Rc<RecordingHandler>,
    presses: usize,
    releases: usize,
}

struct ScriptedPointer {
    id: PointerId,
    path: PointerPath,
    /// Index into the scene's targets of the hovered target.
    hovered: Option<usize>,
}

/// Run `config` to completion, logging every event and optionally writing it to `sink`.
pub fn run(config: &SceneConfig, mut sink: Option<&mut JsonlSink>) -> Result<ScenarioReport> {
    let mut scene = InteractionScene::new();
    let mut buttons = Vec::with_capacity(config.buttons.len());
    let mut pointers = Vec::with_capacity(config.pointers.len());

    for spec in &config.buttons {
        let pose = Pose::new(Vec3::from_array(spec.position), orientation(spec.orientation));
        let target = scene.add_button(ButtonTarget::from_config(pose, &spec.button));
        let recorder = Rc::new(RecordingHandler::new());
        target.button().subscribe(&recorder);
        buttons.push(ScriptedButton {
            name: spec.name.clone(),
            target,
            recorder,
            presses: 0,
            releases: 0,
        });
    }

    for spec in &config.pointers {
        let id = PointerId(spec.id);
        let path = PointerPath::new(spec.keyframes.clone()).with_grasps(spec.grasps.clone());
        let pointer = TouchPointer::new(id)
            .with_touch_radius(spec.touch_radius)
            .with_position(path.position_at(0.0));
        if !scene.add_pointer(pointer) {
            warn!(pointer = %id, "Duplicate pointer id in scene. Skipping");
            continue;
        }
        pointers.push(ScriptedPointer {
            id,
            path,
            hovered: None,
        });
    }

    let frames = config.frame_count();
    let delta_time = 1.0 / config.frame_rate;
    let mut records = Vec::new();
    let mut total_events = 0;

    info!(
        buttons = buttons.len(),
        pointers = pointers.len(),
        frames,
        "Running scene"
    );

    for frame in 0..frames {
        let time = frame as f32 * delta_time;
        let tick = scene.tick();

        for scripted in &pointers {
            let Some(pointer) = scene.pointer_mut(scripted.id) else {
                continue;
            };
            pointer.set_position(scripted.path.position_at(time));

            let grasped = scripted.path.grasped_at(time);
            if pointer.grasped() != grasped {
                pointer.set_grasped(grasped);
                let kind = if grasped { "grasp_start" } else { "grasp_end" };
                let subject = subject_name(&buttons, scripted.hovered);
                records.push(EventRecord::new(tick, kind, subject, scripted.id.to_string()));
            }
        }

        scene.step(delta_time);

        for button in &mut buttons {
            for event in button.recorder.take() {
                match event {
                    ButtonEvent::Pressed(..) => button.presses += 1,
                    ButtonEvent::Released(_) => button.releases += 1,
                    _ => {}
                }
                records.push(event.to_record(tick, &button.name));
            }
        }

        for scripted in &mut pointers {
            let hovered = hovered_index(&scene, scripted.id);
            if hovered != scripted.hovered {
                if scripted.hovered.is_some() {
                    let subject = subject_name(&buttons, scripted.hovered);
                    records.push(EventRecord::new(
                        tick,
                        "pointer_hover_end",
                        subject,
                        scripted.id.to_string(),
                    ));
                }
                if hovered.is_some() {
                    let subject = subject_name(&buttons, hovered);
                    records.push(EventRecord::new(
                        tick,
                        "pointer_hover_start",
                        subject,
                        scripted.id.to_string(),
                    ));
                }
                scripted.hovered = hovered;
            }
        }

        total_events += emit(&mut records, sink.as_deref_mut())?;
    }

    let buttons = buttons
        .iter()
        .map(|button| ButtonSummary {
            name: button.name.clone(),
            presses: button.presses,
            releases: button.releases,
            state: button.target.button().state(),
        })
        .collect();

    Ok(ScenarioReport {
        frames,
        events: total_events,
        buttons,
    })
}

fn orientation(xyzw: [f32; 4]) -> Quat {
    let rotation = Quat::from_array(xyzw);
    if rotation.length_squared() > f32::EPSILON {
        rotation.normalize()
    } else {
        warn!(?xyzw, "Degenerate button orientation. Using identity");
        Quat::IDENTITY
    }
}

fn hovered_index(scene: &InteractionScene, id: PointerId) -> Option<usize> {
    let (hovered, _) = scene.pointer(id)?.hovered_target()?;
    scene
        .targets()
        .iter()
        .position(|target| same_target(target, &hovered))
}

fn subject_name(buttons: &[ScriptedButton], index: Option<usize>) -> String {
    index
        .and_then(|index| buttons.get(index))
        .map_or_else(|| "none".to_string(), |button| button.name.clone())
}

fn emit(records: &mut Vec<EventRecord>, mut sink: Option<&mut JsonlSink>) -> Result<usize> {
    let count = records.len();
    for record in records.drain(..) {
        info!(
            tick = record.tick.0,
            kind = %record.kind,
            subject = %record.subject,
            payload = %record.payload,
            "event"
        );
        if let Some(sink) = sink.as_deref_mut() {
            sink.write(&record)?;
        }
    }
    Ok(count)
}
