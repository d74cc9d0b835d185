//! Create/edit form for a diagnostic test.
//!
//! The form carries its target in `data-*` attributes and a static script submits it as JSON.
//! Client-side checks mirror the server rules; the server remains authoritative and its
//! error message is shown when a request fails.

use super::escape_html;
use dtr_core::{DiagnosticTest, MIN_LABEL_LEN, NOTES_DISPLAY_MAX_LEN};

pub enum FormMode<'a> {
    Create,
    Edit(&'a DiagnosticTest),
}

impl FormMode<'_> {
    fn action(&self) -> String {
        match self {
            FormMode::Create => "/api/tests".to_string(),
            FormMode::Edit(test) => format!("/api/tests/{}", test.id),
        }
    }

    fn method(&self) -> &'static str {
        match self {
            FormMode::Create => "POST",
            FormMode::Edit(_) => "PUT",
        }
    }

    fn submit_label(&self) -> &'static str {
        match self {
            FormMode::Create => "Create Test",
            FormMode::Edit(_) => "Update Test",
        }
    }
}

pub fn render_form(mode: FormMode<'_>) -> String {
    let (patient_name, test_type, result, test_date, notes) = match &mode {
        FormMode::Create => Default::default(),
        FormMode::Edit(test) => (
            escape_html(&test.patient_name),
            escape_html(&test.test_type),
            escape_html(&test.result),
            test.test_date.format("%Y-%m-%d").to_string(),
            escape_html(test.notes.as_deref().unwrap_or_default()),
        ),
    };

    format!(
        "<form id=\"test-form\" data-action=\"{action}\" data-method=\"{method}\" \
         data-min-label=\"{min}\" novalidate>\
         <label for=\"patientName\">Patient Name</label>\
         <input id=\"patientName\" name=\"patientName\" type=\"text\" value=\"{patient_name}\">\
         <p class=\"error\" data-error-for=\"patientName\"></p>\
         <label for=\"testType\">Test Type</label>\
         <input id=\"testType\" name=\"testType\" type=\"text\" value=\"{test_type}\">\
         <p class=\"error\" data-error-for=\"testType\"></p>\
         <label for=\"result\">Result</label>\
         <input id=\"result\" name=\"result\" type=\"text\" value=\"{result}\">\
         <p class=\"error\" data-error-for=\"result\"></p>\
         <label for=\"testDate\">Test Date</label>\
         <input id=\"testDate\" name=\"testDate\" type=\"date\" value=\"{test_date}\">\
         <p class=\"error\" data-error-for=\"testDate\"></p>\
         <label for=\"notes\">Notes</label>\
         <textarea id=\"notes\" name=\"notes\" rows=\"4\" maxlength=\"{notes_max}\">{notes}</textarea>\
         <p class=\"error\" id=\"form-error\"></p>\
         <div class=\"actions\">\
         <a class=\"button secondary\" href=\"/\">Cancel</a>\
         <button type=\"submit\" class=\"button primary\">{submit}</button>\
         </div></form><script>{FORM_SCRIPT}</script>",
        action = mode.action(),
        method = mode.method(),
        min = MIN_LABEL_LEN,
        notes_max = NOTES_DISPLAY_MAX_LEN,
        submit = mode.submit_label(),
    )
}

const FORM_SCRIPT: &str = r#"
(function () {
  const form = document.getElementById('test-form');
  const formError = document.getElementById('form-error');
  const submit = form.querySelector('button[type="submit"]');
  const submitLabel = submit.textContent;
  const minLabel = Number(form.dataset.minLabel);
  const datePattern = /^(\d{4})-(\d{2})-(\d{2})$/;

  function isValidDate(value) {
    const match = datePattern.exec(value);
    if (!match) { return false; }
    const year = Number(match[1]);
    const month = Number(match[2]) - 1;
    const day = Number(match[3]);
    const date = new Date(Date.UTC(year, month, day));
    return date.getUTCFullYear() === year && date.getUTCMonth() === month && date.getUTCDate() === day;
  }

  function setError(field, message) {
    const slot = form.querySelector('[data-error-for="' + field + '"]');
    if (slot) { slot.textContent = message || ''; }
  }

  function validate(data) {
    let ok = true;
    [['patientName', 'Patient name'], ['testType', 'Test type']].forEach(function (pair) {
      const length = Array.from(data[pair[0]]).length;
      if (length < minLabel) {
        setError(pair[0], pair[1] + ' must be at least ' + minLabel + ' characters.');
        ok = false;
      } else {
        setError(pair[0], '');
      }
    });
    setError('result', '');
    if (!isValidDate(data.testDate)) {
      setError('testDate', 'Invalid date format.');
      ok = false;
    } else {
      setError('testDate', '');
    }
    return ok;
  }

  form.addEventListener('submit', async function (event) {
    event.preventDefault();
    formError.textContent = '';
    const data = {
      patientName: form.patientName.value,
      testType: form.testType.value,
      result: form.result.value,
      testDate: form.testDate.value,
      notes: form.notes.value === '' ? null : form.notes.value
    };
    if (!validate(data)) { return; }

    submit.disabled = true;
    submit.textContent = 'Saving...';
    try {
      const response = await fetch(form.dataset.action, {
        method: form.dataset.method,
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify(data)
      });
      if (!response.ok) {
        const body = await response.json().catch(function () { return {}; });
        const message = body.error || 'Failed to save diagnostic test';
        formError.textContent = message;
        window.alert(message);
        return;
      }
      window.location.assign('/');
    } catch (error) {
      console.error('Error saving test:', error);
      formError.textContent = 'Failed to save diagnostic test';
    } finally {
      submit.disabled = false;
      submit.textContent = submitLabel;
    }
  });
})();
"#;
