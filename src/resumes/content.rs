use std::fmt::{self, Write};

use super::dto::{BasicInfo, FormData};
use crate::errors::AppError;

pub const DEFAULT_TEMPLATE_ID: u32 = 1;

/// Rejects forms missing the fields the résumé header and education block need.
pub fn validate(form: &FormData) -> Result<(), AppError> {
    if form.basic_info.name.is_empty() || form.basic_info.job_title.is_empty() {
        return Err(AppError::BadRequest(
            "Name and target position are required".into(),
        ));
    }
    if form.education.school.is_empty() || form.education.degree.is_empty() {
        return Err(AppError::BadRequest(
            "Please complete the education section".into(),
        ));
    }
    Ok(())
}

/// Flattens the form into the plain-text description sent to the generation service.
pub fn build_resume_content(form: &FormData) -> String {
    let mut out = String::new();
    // fmt::Write for String never errors.
    write_resume_content(&mut out, form).ok();
    out
}

fn write_resume_content(out: &mut impl Write, form: &FormData) -> fmt::Result {
    let info = &form.basic_info;
    let edu = &form.education;

    writeln!(out, "Name: {}", info.name)?;
    writeln!(out, "Target position: {}", info.job_title)?;
    writeln!(out, "Contact: {} | {}", info.phone, info.email)?;
    if let Some(address) = info.address.as_deref().filter(|a| !a.is_empty()) {
        writeln!(out, "Location: {address}")?;
    }

    writeln!(out, "\nEducation:")?;
    writeln!(
        out,
        "{} | {} | {} | {}",
        edu.school, edu.degree, edu.major, edu.period
    )?;

    if !form.experiences.is_empty() {
        writeln!(out, "\nWork experience:")?;
        for exp in &form.experiences {
            writeln!(out, "{} | {} | {}", exp.company, exp.position, exp.period)?;
            writeln!(out, "Responsibilities: {}", exp.description)?;
        }
    }

    let skills: Vec<&str> = form
        .skills
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if !skills.is_empty() {
        writeln!(out, "\nSkills:\n{}", skills.join(", "))?;
    }

    if !form.projects.is_empty() {
        writeln!(out, "\nProjects:")?;
        for project in &form.projects {
            writeln!(out, "{}", project.name)?;
            writeln!(out, "Project description: {}", project.description)?;
        }
    }
    Ok(())
}

/// Header markup for the chosen template; the page renders the generated text into
/// `#formatted-content` itself.
pub fn render_resume_html(template_id: u32, info: &BasicInfo) -> String {
    let address = info
        .address
        .as_deref()
        .filter(|a| !a.is_empty())
        .map(|a| format!("\n        <p class=\"address\">{}</p>", escape_html(a)))
        .unwrap_or_default();

    format!(
        r#"<div class="resume-container template-{template_id}">
    <div class="resume-header">
        <h1>{name}</h1>
        <p class="job-title">{job_title}</p>
        <p class="contact-info">{phone} | {email}</p>{address}
    </div>
    <div class="resume-content">
        <div id="formatted-content"></div>
    </div>
</div>"#,
        name = escape_html(&info.name),
        job_title = escape_html(&info.job_title),
        phone = escape_html(&info.phone),
        email = escape_html(&info.email),
    )
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resumes::dto::{Education, Experience, Project};

    fn form() -> FormData {
        FormData {
            basic_info: BasicInfo {
                name: "Alice".into(),
                job_title: "Backend Engineer".into(),
                phone: "555-0100".into(),
                email: "alice@example.com".into(),
                address: Some("Berlin".into()),
            },
            education: Education {
                school: "TU Berlin".into(),
                degree: "MSc".into(),
                major: "Computer Science".into(),
                period: "2016-2018".into(),
            },
            experiences: vec![Experience {
                company: "Acme".into(),
                position: "Engineer".into(),
                period: "2018-2023".into(),
                description: "Built the billing pipeline".into(),
            }],
            skills: vec!["Rust".into(), " ".into(), " SQL ".into()],
            projects: vec![Project {
                name: "jobsense".into(),
                description: "Resume builder".into(),
            }],
        }
    }

    #[test]
    fn content_contains_every_section_in_order() {
        let text = build_resume_content(&form());
        let expected = [
            "Name: Alice",
            "Target position: Backend Engineer",
            "Contact: 555-0100 | alice@example.com",
            "Location: Berlin",
            "Education:\nTU Berlin | MSc | Computer Science | 2016-2018",
            "Work experience:\nAcme | Engineer | 2018-2023\nResponsibilities: Built the billing pipeline",
            "Skills:\nRust, SQL",
            "Projects:\njobsense\nProject description: Resume builder",
        ];
        let mut from = 0;
        for part in expected {
            let at = text[from..].find(part).unwrap_or_else(|| panic!("missing {part:?} in {text}"));
            from += at + part.len();
        }
    }

    #[test]
    fn optional_sections_are_omitted_when_empty() {
        let mut f = form();
        f.basic_info.address = None;
        f.experiences.clear();
        f.skills = vec!["".into()];
        f.projects.clear();

        let text = build_resume_content(&f);
        assert!(!text.contains("Location:"));
        assert!(!text.contains("Work experience:"));
        assert!(!text.contains("Skills:"));
        assert!(!text.contains("Projects:"));
        assert!(text.contains("Education:"));
    }

    #[test]
    fn validation_requires_header_and_education() {
        assert!(validate(&form()).is_ok());

        let mut f = form();
        f.basic_info.job_title.clear();
        assert!(matches!(validate(&f), Err(AppError::BadRequest(_))));

        let mut f = form();
        f.education.degree.clear();
        assert!(matches!(validate(&f), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn html_uses_template_class_and_escapes_user_text() {
        let mut f = form();
        f.basic_info.name = "<script>alert(1)</script>".into();
        let html = render_resume_html(3, &f.basic_info);

        assert!(html.contains("template-3"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(html.contains(r#"<p class="address">Berlin</p>"#));
        assert!(html.contains(r#"<div id="formatted-content"></div>"#));
    }

    #[test]
    fn html_omits_missing_address() {
        let mut f = form();
        f.basic_info.address = Some(String::new());
        assert!(!render_resume_html(DEFAULT_TEMPLATE_ID, &f.basic_info).contains("address"));
    }
}
