use super::*;

fn publish_band(app_state: &mut AppState, band_tx: &watch::Sender<ThresholdBand>, band: ThresholdBand) {
    app_state.band = band;
    band_tx.send_replace(band);
    tracing::info!(low = band.low(), high = band.high(), "Band updated");
    app_state.push_log(format!("Band set to {:.2} - {:.2}", band.low(), band.high()));
}

pub(super) fn handle_main_command(
    cmd: UiCommand,
    app_state: &mut AppState,
    band_tx: &watch::Sender<ThresholdBand>,
    running_tx: &watch::Sender<bool>,
    app_tx: &mpsc::Sender<AppEvent>,
) {
    match cmd {
        UiCommand::Pause | UiCommand::Resume => {
            let running = cmd == UiCommand::Resume;
            if *running_tx.borrow() != running {
                running_tx.send_replace(running);
                tracing::info!(running, "Polling state changed");
                let _ = app_tx.try_send(AppEvent::PollingState { running });
            }
        }
        UiCommand::EditBound(field) => {
            app_state.editor = Some(BandEditor::new(field, &app_state.band));
        }
        UiCommand::LowerBound(field) | UiCommand::RaiseBound(field) => {
            let delta = if matches!(cmd, UiCommand::LowerBound(_)) {
                -app_state.band_step
            } else {
                app_state.band_step
            };
            match step_bound(&app_state.band, field, delta) {
                Ok(band) => publish_band(app_state, band_tx, band),
                Err(e) => app_state.push_log(format!("[WARN] {}", e)),
            }
        }
        UiCommand::Quit => {}
    }
}

pub(super) fn handle_edit_command(
    cmd: EditCommand,
    app_state: &mut AppState,
    band_tx: &watch::Sender<ThresholdBand>,
) {
    let Some(editor) = app_state.editor.as_mut() else {
        return;
    };
    match cmd {
        EditCommand::Push(c) => editor.push(c),
        EditCommand::Backspace => editor.backspace(),
        EditCommand::Cancel => {
            app_state.editor = None;
        }
        EditCommand::Apply => {
            let result = editor.apply(&app_state.band);
            let field = editor.field;
            app_state.editor = None;
            match result {
                Ok(band) => publish_band(app_state, band_tx, band),
                Err(e) => {
                    tracing::warn!(field = field.label(), error = %e, "Rejected band edit");
                    app_state.push_log(format!("[ERR] {} bound rejected: {}", field.label(), e));
                }
            }
        }
    }
}
