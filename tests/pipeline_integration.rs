use finecheck::{
    assess_appeal, extract_fine, AppealAssessment, AppealReason, FineDetails, InlineImage,
    PipelineError, RecoveryError, RecoveryStatus, Strategy, StubProvider,
};
use serde_json::json;

fn sample_details() -> FineDetails {
    FineDetails::from(json!({
        "contravention_code": "12",
        "location": "Main St",
        "date": "2024-01-01",
        "amount": "60",
        "reason": "No permit"
    }))
}

#[tokio::test]
async fn medical_emergency_scenario_end_to_end() {
    let stub = StubProvider::replying(
        "```json\n{\"appeal_strength\":\"strong\",\"confidence_score\":80,\"reasoning_summary\":\"Medical emergencies are commonly accepted.\"}\n```",
    );

    let outcome = assess_appeal(
        &stub,
        &sample_details(),
        &AppealReason::from("Medical emergency"),
    )
    .await
    .expect("provider succeeded");

    assert_eq!(outcome.status, RecoveryStatus::Parsed(Strategy::Direct));
    assert_eq!(
        outcome.assessment.into_value(),
        json!({
            "appeal_strength": "strong",
            "confidence_score": 80,
            "reasoning_summary": "Medical emergencies are commonly accepted."
        })
    );

    let requests = stub.requests();
    assert_eq!(requests.len(), 1);
    let prompt = &requests[0].prompt;
    assert!(prompt.contains("Contravention code: 12"));
    assert!(prompt.contains("Location: Main St"));
    assert!(prompt.contains("Reason: Medical emergency"));
    assert!(prompt.contains("Category: General"));
    assert!(requests[0].image.is_none());
}

#[tokio::test]
async fn structured_reason_reaches_prompt() {
    let stub = StubProvider::replying(
        r#"{"appeal_strength":"weak","confidence_score":20,"reasoning_summary":"Signs were visible."}"#,
    );
    let reason = AppealReason::from(json!({
        "category": "Signage",
        "reason": "Sign was hidden by a tree",
        "personal_note": "I have photos"
    }));

    assess_appeal(&stub, &FineDetails::default(), &reason)
        .await
        .unwrap();

    let prompt = &stub.requests()[0].prompt;
    assert!(prompt.contains("Category: Signage"));
    assert!(prompt.contains("Reason: Sign was hidden by a tree"));
    assert!(prompt.contains("Additional notes: I have photos"));
    assert!(prompt.contains("Location: Unknown"));
}

#[tokio::test]
async fn chatty_completion_still_yields_fallback_not_error() {
    let stub = StubProvider::replying("I think this appeal is fairly strong, good luck!");

    let outcome = assess_appeal(&stub, &sample_details(), &AppealReason::from("Broken meter"))
        .await
        .unwrap();

    assert!(outcome.status.is_fallback());
    assert_eq!(outcome.assessment, AppealAssessment::fallback());
}

#[tokio::test]
async fn extraction_sends_image_and_defaults_missing_fields() {
    let stub = StubProvider::replying(
        "Here are the details:\n{\"fineAmount\":\"£70\",\"carRegistration\":\"AB12 CDE\"}",
    );
    let image = InlineImage::new("image/jpeg", vec![0xFF, 0xD8, 0xFF, 0xE0]);

    let outcome = extract_fine(&stub, image.clone()).await.unwrap();

    assert_eq!(outcome.strategy, Strategy::BraceSpan);
    assert_eq!(outcome.data.fine_amount, "£70");
    assert_eq!(outcome.data.car_registration, "AB12 CDE");
    assert_eq!(outcome.data.infraction_date, "");
    assert_eq!(outcome.data.location_address, "");
    assert_eq!(outcome.data.fine_reference_number, "");

    let requests = stub.requests();
    assert_eq!(requests[0].image.as_ref(), Some(&image));
    assert!(requests[0].prompt.contains("fineReferenceNumber"));
}

#[tokio::test]
async fn empty_completion_on_appeal_path_yields_fallback() {
    for blank in ["", "   ", "\n\t"] {
        let stub = StubProvider::replying(blank);

        let outcome = assess_appeal(&stub, &sample_details(), &AppealReason::from("Broken meter"))
            .await
            .expect("empty completion is absorbed");

        assert_eq!(outcome.status, RecoveryStatus::Fallback(RecoveryError::Empty));
        assert_eq!(outcome.assessment, AppealAssessment::fallback());
    }
}

#[tokio::test]
async fn empty_completion_on_extraction_path_is_a_recovery_error() {
    let stub = StubProvider::replying("");

    let err = extract_fine(&stub, InlineImage::new("image/jpeg", vec![0xFF, 0xD8]))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        PipelineError::Recovery {
            source: RecoveryError::Empty,
            raw: String::new(),
        }
    );
}
