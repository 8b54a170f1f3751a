//! Plain-text rendering of the views for the terminal.

use std::fmt::Write;

use crate::models::opening::Opening;
use crate::upload::{UploadState, UploadWorkflow};
use crate::views::{DetailPhase, OpeningDetailView, OpeningsListView};

fn text(value: Option<&str>) -> &str {
    value.unwrap_or("")
}

fn manager(opening: &Opening) -> (&str, &str) {
    let hm = opening.hiring_manager.as_ref();
    (
        text(hm.and_then(|m| m.name.as_deref())),
        text(hm.and_then(|m| m.email.as_deref())),
    )
}

pub fn render_openings(view: &OpeningsListView) -> String {
    let mut out = String::from("Contract Openings\n\n");
    let _ = writeln!(
        out,
        "{:<22} {:<32} {:<18} {:<14} {:<12} Hiring Manager",
        "Link", "Title", "Location", "Contract Type", "Posted Date"
    );

    if view.is_loading() {
        out.push_str("Loading...\n");
    } else if view.openings().is_empty() {
        out.push_str("No openings found.\n");
    } else {
        for (i, o) in view.openings().iter().enumerate() {
            let (name, email) = manager(o);
            let link = view.select(i).map(|route| route.path()).unwrap_or_default();
            let _ = writeln!(
                out,
                "{:<22} {:<32} {:<18} {:<14} {:<12} {} <{}>",
                link,
                text(o.title.as_deref()),
                text(o.location.as_deref()),
                text(o.contract_type.as_deref()),
                o.posted_on().unwrap_or_else(|| "-".to_string()),
                name,
                email
            );
        }
    }

    if let Some(summary) = view.summary() {
        let _ = writeln!(out, "\n{summary}");
        let flag = |enabled: bool| if enabled { "" } else { " (disabled)" };
        let _ = writeln!(
            out,
            "Go Back{} | Prev{} | Next{}",
            flag(view.can_go_back()),
            flag(view.can_go_back()),
            flag(view.can_go_next())
        );
    }
    out
}

pub fn render_detail(view: &OpeningDetailView) -> String {
    let opening = match (view.phase(), view.opening()) {
        (DetailPhase::Loading, _) => return "Loading...\n".to_string(),
        (DetailPhase::Error(e), _) => return format!("Error: {e}\n"),
        (DetailPhase::NotFound, _) | (DetailPhase::Ready, None) => {
            return "Opening not found\n".to_string()
        }
        (DetailPhase::Ready, Some(opening)) => opening,
    };

    let mut out = String::new();
    let _ = writeln!(out, "{}", text(opening.title.as_deref()));
    let _ = writeln!(
        out,
        "[{}] {}\n",
        view.status().as_str(),
        opening.posted_on().unwrap_or_default()
    );

    let _ = writeln!(out, "Description\n  {}\n", text(opening.description.as_deref()));

    let _ = writeln!(out, "Candidate Profiles Uploaded {}", view.profiles().len());
    if view.profiles().is_empty() {
        out.push_str("  No profiles uploaded yet.\n");
    }
    for p in view.profiles() {
        let _ = write!(out, "  - {} [{}]", p.filename, p.status_label());
        if let Some(id) = &p.id {
            let _ = write!(out, " id={id}");
        }
        if p.s3_key.is_none() {
            out.push_str(" (no preview)");
        }
        out.push('\n');
    }

    let _ = writeln!(
        out,
        "\nJob Details\n  Location: {}\n  Contract Type: {}\n  Experience: {} - {} years",
        text(opening.location.as_deref()),
        text(opening.contract_type.as_deref()),
        text(opening.experience_min.as_deref()),
        text(opening.experience_max.as_deref())
    );

    let (name, email) = manager(opening);
    let _ = writeln!(out, "\nHiring Manager\n  {name}\n  {email}");

    if let Some(wf) = view.upload() {
        out.push('\n');
        out.push_str(&render_upload(wf));
    }
    out
}

pub fn render_upload(wf: &UploadWorkflow) -> String {
    let mut out = String::from("Upload Candidate Profiles\n");
    if !wf.files().is_empty() {
        let _ = writeln!(out, "Selected Files ({})", wf.files().len());
        for (i, f) in wf.files().iter().enumerate() {
            let _ = writeln!(out, "  {}. {}", i + 1, f.name);
        }
    }
    let status = match wf.state() {
        UploadState::Idle | UploadState::Staging => None,
        UploadState::Uploading { index, total } => {
            Some(format!("Uploading {}/{}...", index + 1, total))
        }
        UploadState::Persisting { .. } => Some("Saving...".to_string()),
        UploadState::Done => Some("Done".to_string()),
        UploadState::Failed(msg) => Some(format!("Failed: {msg}")),
    };
    if let Some(status) = status {
        let _ = writeln!(out, "{status}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::api::testing::{opening, FakeApi};
    use crate::models::opening::OpeningsPage;
    use crate::models::staged::StagedFile;
    use crate::presenter::testing::RecordingPresenter;
    use serde_json::json;

    #[tokio::test]
    async fn test_detail_renders_job_details_and_tags() {
        let api = Arc::new(FakeApi::new().with_opening(Ok(Some(opening(json!({
            "id": "42",
            "title": "Data Engineer",
            "description": "Pipelines",
            "location": "Austin",
            "contractType": "W2",
            "experienceMin": 3,
            "experienceMax": 6,
            "postedDate": "2025-01-05T00:00:00Z",
            "status": "PENDING",
            "hiringManager": {"name": "Sam", "email": "sam@corp.test"},
            "profiles": [
                {"id": "p1", "fileName": "a.pdf", "s3Key": "k/a.pdf", "isDraft": true},
                {"id": "p2", "filename": "b.pdf"}
            ]
        }))))));
        let mut view = OpeningDetailView::new(api, Arc::new(RecordingPresenter::default()));
        view.set_identifier(Some("42")).await;

        let out = render_detail(&view);
        assert!(out.starts_with("Data Engineer\n[PENDING] 2025-01-05"));
        assert!(out.contains("Candidate Profiles Uploaded 2"));
        assert!(out.contains("  - a.pdf [Draft] id=p1\n"));
        assert!(out.contains("  - b.pdf [Submitted] id=p2 (no preview)\n"));
        assert!(out.contains("Experience: 3 - 6 years"));
        assert!(out.contains("Sam\n  sam@corp.test"));
    }

    #[tokio::test]
    async fn test_detail_states() {
        let api = Arc::new(FakeApi::new().with_opening(Ok(Some(opening(json!({"id": "1"}))))));
        let mut view = OpeningDetailView::new(api, Arc::new(RecordingPresenter::default()));
        assert_eq!(render_detail(&view), "Loading...\n");

        view.set_identifier(Some("1")).await;
        assert!(render_detail(&view).contains("No profiles uploaded yet."));

        view.open_upload();
        view.upload_mut()
            .unwrap()
            .stage_dropped(vec![StagedFile::new("x.pdf", vec![])]);
        let out = render_detail(&view);
        assert!(out.contains("Upload Candidate Profiles\nSelected Files (1)\n  1. x.pdf"));
    }

    #[tokio::test]
    async fn test_openings_table_and_controls() {
        let page: OpeningsPage = serde_json::from_value(json!({
            "openings": [{"id": 5, "title": "QA Lead", "location": "Remote", "contractType": "C2H",
                          "hiringManager": {"name": "Kim", "email": "kim@corp.test"}}],
            "pagination": {"currentPage": 1, "itemsPerPage": 10, "totalItems": 1, "totalPages": 1}
        }))
        .unwrap();
        let api = Arc::new(FakeApi::new().with_page(Ok(page)));
        let mut view = OpeningsListView::new(api, 10);

        assert!(render_openings(&view).contains("No openings found."));

        view.fetch(1).await;
        let out = render_openings(&view);
        assert!(out.contains("/vendor/openings/5"));
        assert!(out.contains("QA Lead"));
        assert!(out.contains("Kim <kim@corp.test>"));
        assert!(out.contains(" - "), "missing posted date renders as dash");
        assert!(out.contains("Showing 1 to 1 of 1 results"));
        assert!(out.contains("Go Back (disabled) | Prev (disabled) | Next (disabled)"));
    }
}
