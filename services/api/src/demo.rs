use crate::infra::{
    InMemoryAccountRepository, InMemoryAssessmentCatalog, InMemoryLinkRepository,
};
use clap::Args;
use skillgate::access::{
    AccessService, AccountId, AccountRole, CodeGenerator, NewAccount,
};
use skillgate::error::AppError;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Number of additional recruiters to link beyond the first
    #[arg(long, default_value_t = 1)]
    pub(crate) extra_recruiters: u8,
}

type DemoService = AccessService<
    InMemoryAccountRepository,
    InMemoryLinkRepository,
    InMemoryAssessmentCatalog,
>;

fn new_account(id: &str, name: &str, role: AccountRole) -> NewAccount {
    NewAccount {
        id: AccountId(id.to_string()),
        display_name: name.to_string(),
        role,
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let links = Arc::new(InMemoryLinkRepository::default());
    let catalog = Arc::new(InMemoryAssessmentCatalog::default());
    let service: DemoService = AccessService::new(
        Arc::new(InMemoryAccountRepository::default()),
        links.clone(),
        catalog.clone(),
        CodeGenerator::default(),
    );

    println!("Recruiter access demo");

    let recruiter = service.register_account(new_account(
        "rec-001",
        "Dana Osei",
        AccountRole::Recruiter,
    ))?;
    let code = recruiter
        .recruiter_code
        .clone()
        .expect("recruiter roles receive a code at registration");
    catalog.set_owned(&recruiter.id, &["asmt-backend-101", "asmt-sql-201"]);
    println!(
        "\nRegistered recruiter {} with share code {}",
        recruiter.display_name, code
    );

    let student = service.register_account(new_account(
        "stu-001",
        "Sam Quinn",
        AccountRole::Student,
    ))?;
    catalog.assign_direct(&student.id, &["asmt-intro-100"]);
    println!(
        "Registered student {} (directly assigned: asmt-intro-100)",
        student.display_name
    );

    let lowercase = code.as_str().to_ascii_lowercase();
    let validation = service.validate_code(&lowercase)?;
    println!(
        "\nStudent validates '{}': {} ({})",
        lowercase,
        if validation.is_valid { "valid" } else { "invalid" },
        validation.message
    );

    let outcome = service.link(&student.id, code.as_str())?;
    println!(
        "Linked to {}; unlocked {} assessment(s)",
        outcome.recruiter_name,
        outcome.linked_assessment_ids.len()
    );

    let repeat = service.link(&student.id, code.as_str())?;
    println!(
        "Presented the same code again: still one link row ({}), linked at {}",
        links.row_count(),
        repeat.linked_at
    );

    for index in 0..args.extra_recruiters {
        let extra = service.register_account(new_account(
            &format!("rec-{:03}", index + 2),
            &format!("Recruiter {}", index + 2),
            AccountRole::Recruiter,
        ))?;
        let extra_code = extra
            .recruiter_code
            .expect("recruiter roles receive a code at registration");
        service.link(&student.id, extra_code.as_str())?;
    }

    println!("\nLinked recruiters");
    for summary in service.recruiters_for(&student.id)? {
        println!("- {} (linked {})", summary.display_name, summary.linked_at);
    }

    println!("\nVisible assessments");
    for assessment in service.visible_assessments(&student.id)? {
        println!("- {}", assessment.0);
    }

    Ok(())
}
