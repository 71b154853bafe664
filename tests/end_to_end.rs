// End-to-end wizard scenarios: a three-step "create project" flow driven
// through the scripted host, composed with a progress reporter and the
// single-flight command gate the way calling code is expected to wire
// them together.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use stepflow::host::scripted::{Feed, Notification, ScriptedHost};
use stepflow::host::ProgressHost;
use stepflow::surface::{InputEvent, PickEvent};
use stepflow::{
    step, CommandGate, InputParams, InputResponse, Outcome, PickEntry, PickParams, PickResponse,
    ProgressError, ProgressReporter, ReporterState, Step, StepOutcome, StepRunner, WizardResult,
};

#[derive(Debug, Default)]
struct ProjectDraft {
    options: Vec<String>,
    template: Option<String>,
    name: Option<String>,
}

struct Flow {
    draft: Arc<Mutex<ProjectDraft>>,
    trace: Arc<Mutex<Vec<&'static str>>>,
    reporter: Arc<Mutex<ProgressReporter>>,
    input_dismissed: Arc<AtomicBool>,
}

impl Flow {
    fn new() -> Self {
        Self {
            draft: Arc::new(Mutex::new(ProjectDraft::default())),
            trace: Arc::new(Mutex::new(Vec::new())),
            reporter: Arc::new(Mutex::new(ProgressReporter::new("Creating Project", true))),
            input_dismissed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Step 3: free-text project name with live validation
    fn enter_name(&self) -> Step {
        let draft = Arc::clone(&self.draft);
        let trace = Arc::clone(&self.trace);
        let reporter = Arc::clone(&self.reporter);
        let dismissed = Arc::clone(&self.input_dismissed);
        step(move |runner| {
            trace.lock().push("EnterName");
            let dismissed = Arc::clone(&dismissed);
            reporter.lock().set(
                Some(35.0),
                Some("Entering project name"),
                Some(Box::new(move || dismissed.store(true, Ordering::SeqCst))),
            )?;

            let params = InputParams::new("Enter the project name", 3, 3).with_validator(
                Arc::new(|value: &str| {
                    (value.len() < 3)
                        .then(|| "Project name must be at least 3 characters".to_string())
                }),
            );
            match runner.input(params)? {
                Outcome::Accepted(InputResponse::Value(value)) => {
                    draft.lock().name = Some(value);
                    Ok(StepOutcome::Finished)
                }
                Outcome::Accepted(InputResponse::Action(_)) => Ok(StepOutcome::Finished),
                Outcome::Signal(signal) => Ok(StepOutcome::Signal(signal)),
            }
        })
    }

    /// Step 2: single-select template picker
    fn choose_template(&self, next: Step) -> Step {
        let draft = Arc::clone(&self.draft);
        let trace = Arc::clone(&self.trace);
        let reporter = Arc::clone(&self.reporter);
        step(move |runner| {
            trace.lock().push("ChooseTemplate");
            reporter
                .lock()
                .set(Some(15.0), Some("Choosing template"), None)?;

            let params = PickParams::new(
                "Choose template",
                2,
                3,
                vec![
                    PickEntry::new("v5-comp", "v5-comp"),
                    PickEntry::new("v5-clawbot", "v5-clawbot"),
                ],
            );
            match runner.pick(params)? {
                Outcome::Accepted(PickResponse::Picked(entries)) => {
                    if let Some(entry) = entries.first() {
                        draft.lock().template = Some(entry.key.clone());
                    }
                    Ok(StepOutcome::Next(next.clone()))
                }
                Outcome::Accepted(PickResponse::Action(_)) => Ok(StepOutcome::Finished),
                Outcome::Signal(signal) => Ok(StepOutcome::Signal(signal)),
            }
        })
    }

    /// Step 1: multi-select creation options, both preselected
    fn choose_options(&self, next: Step) -> Step {
        let draft = Arc::clone(&self.draft);
        let trace = Arc::clone(&self.trace);
        let reporter = Arc::clone(&self.reporter);
        step(move |runner| {
            trace.lock().push("ChooseOptions");
            reporter
                .lock()
                .set(Some(5.0), Some("Choosing options to create project"), None)?;

            let mut params = PickParams::new(
                "Choose options to create project",
                1,
                3,
                vec![
                    PickEntry::new("pullTemplate", "Pull the latest template from remote server"),
                    PickEntry::new("createRemote", "Create a remote repository"),
                ],
            );
            params.multi_select = true;
            params.preselected = vec![0, 1];

            match runner.pick(params)? {
                Outcome::Accepted(PickResponse::Picked(entries)) => {
                    draft.lock().options = entries.iter().map(|e| e.key.clone()).collect();
                    Ok(StepOutcome::Next(next.clone()))
                }
                Outcome::Accepted(PickResponse::Action(_)) => Ok(StepOutcome::Finished),
                Outcome::Signal(signal) => Ok(StepOutcome::Signal(signal)),
            }
        })
    }

    fn run(&self, host: &ScriptedHost) -> WizardResult<bool> {
        self.reporter.lock().init(Arc::new(host.clone()))?;

        let start = self.choose_options(self.choose_template(self.enter_name()));
        let mut runner = StepRunner::new(Arc::new(host.clone()));
        runner.run(start)?;

        let finished = self.draft.lock().name.is_some();
        if finished {
            self.reporter
                .lock()
                .set(Some(100.0), Some("Project created"), None)?;
            host.notify_info("Project created successfully");
        } else {
            // The wizard ended early. If the progress display was
            // cancelled the reporter has already told the user; anything
            // else would be a plain early exit.
            if let Err(err) = self.reporter.lock().assert_continue() {
                assert!(matches!(err, ProgressError::Cancelled));
            }
        }
        self.reporter.lock().resolve();
        Ok(finished)
    }
}

#[test]
fn test_back_then_cancel_reports_cancellation_exactly_once() {
    let host = ScriptedHost::new();
    // ChooseOptions confirmed; ChooseTemplate backs out; ChooseOptions
    // confirmed again; ChooseTemplate picked; progress cancelled while
    // EnterName is open, which also hides the input box.
    host.push_script(vec![Feed::Pick(PickEvent::Confirmed)]);
    host.push_script(vec![Feed::Pick(PickEvent::Back)]);
    host.push_script(vec![Feed::Pick(PickEvent::Confirmed)]);
    host.push_script(vec![Feed::Pick(PickEvent::SelectionChanged(vec![1]))]);
    host.push_script(vec![Feed::CancelProgress, Feed::Input(InputEvent::Hidden)]);

    let flow = Flow::new();
    let gate = CommandGate::new();
    let finished = gate
        .run("create-project", &host, || flow.run(&host))
        .unwrap()
        .expect("gate was free");

    // The sequence terminated with no final state
    assert!(!finished);
    assert_eq!(
        *flow.trace.lock(),
        vec![
            "ChooseOptions",
            "ChooseTemplate",
            "ChooseOptions",
            "ChooseTemplate",
            "EnterName"
        ]
    );

    let draft = flow.draft.lock();
    assert_eq!(draft.options, vec!["pullTemplate", "createRemote"]);
    assert_eq!(draft.template.as_deref(), Some("v5-clawbot"));
    assert_eq!(draft.name, None);
    drop(draft);

    // Back navigation re-reported an earlier percentage; increments still
    // sum to the last cumulative value, applied in call order
    let increments: Vec<f64> = host.reports().iter().map(|(inc, _)| *inc).collect();
    assert_eq!(increments, vec![5.0, 10.0, -10.0, 10.0, 20.0]);
    assert_eq!(increments.iter().sum::<f64>(), 35.0);

    // Cancellation was reported to the user exactly once
    let errors = host
        .notifications()
        .iter()
        .filter(|n| matches!(n, Notification::Error(_)))
        .count();
    assert_eq!(errors, 1);
    assert!(host
        .notifications()
        .contains(&Notification::Error("Operation cancelled by user".to_string())));

    // Cancelling the progress display dismissed the nested input surface
    assert!(flow.input_dismissed.load(Ordering::SeqCst));

    // Five surfaces, never more than one visible, all disposed, Back only
    // offered once history existed
    let surfaces = host.surfaces();
    assert_eq!(surfaces.len(), 5);
    assert_eq!(host.max_live_surfaces(), 1);
    assert!(surfaces.iter().all(|s| s.lock().disposed));
    let back_flags: Vec<bool> = surfaces.iter().map(|s| s.lock().back_enabled).collect();
    assert_eq!(back_flags, vec![false, true, false, true, true]);

    // Teardown ran exactly once and the gate is free again
    assert_eq!(flow.reporter.lock().state(), ReporterState::Resolved);
    assert_eq!(host.finish_count(), 1);
    assert!(!gate.is_busy());
}

#[test]
fn test_completed_flow_reports_success() {
    let host = ScriptedHost::new();
    host.push_script(vec![Feed::Pick(PickEvent::Confirmed)]);
    host.push_script(vec![Feed::Pick(PickEvent::SelectionChanged(vec![0]))]);
    host.push_script(vec![
        Feed::Input(InputEvent::ValueChanged("my-bot".to_string())),
        Feed::Input(InputEvent::Accepted),
    ]);

    let flow = Flow::new();
    let finished = flow.run(&host).unwrap();

    assert!(finished);
    let draft = flow.draft.lock();
    assert_eq!(draft.template.as_deref(), Some("v5-comp"));
    assert_eq!(draft.name.as_deref(), Some("my-bot"));
    drop(draft);

    let increments: Vec<f64> = host.reports().iter().map(|(inc, _)| *inc).collect();
    assert_eq!(increments, vec![5.0, 10.0, 20.0, 65.0]);
    assert_eq!(increments.iter().sum::<f64>(), 100.0);

    assert!(host
        .notifications()
        .contains(&Notification::Info("Project created successfully".to_string())));
    assert_eq!(host.finish_count(), 1);
}
