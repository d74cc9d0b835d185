//! Record cards shown on the home page.

use super::escape_html;
use dtr_core::DiagnosticTest;

/// Render the card grid, or the empty-state message when there are no records.
pub fn render_list(tests: &[DiagnosticTest]) -> String {
    if tests.is_empty() {
        return "<p class=\"muted\">No diagnostic tests yet.</p>".to_string();
    }

    let cards: String = tests.iter().map(render_card).collect();
    format!("<div class=\"cards\">{cards}</div><script>{LIST_SCRIPT}</script>")
}

fn render_card(test: &DiagnosticTest) -> String {
    let notes = match &test.notes {
        Some(notes) if !notes.is_empty() => {
            format!("<p class=\"muted\">{}</p>", escape_html(notes))
        }
        _ => String::new(),
    };

    format!(
        "<div class=\"card\">\
         <h3>{patient}</h3>\
         <p class=\"muted\">{test_type}</p>\
         <p><strong>Result:</strong> {result}</p>\
         <p class=\"muted\">Date: {date}</p>\
         {notes}\
         <div class=\"actions\">\
         <a class=\"link edit\" href=\"/edit/{id}\" title=\"Edit\">Edit</a>\
         <button type=\"button\" class=\"link delete\" data-delete-id=\"{id}\" title=\"Delete\">Delete</button>\
         </div></div>",
        patient = escape_html(&test.patient_name),
        test_type = escape_html(&test.test_type),
        result = escape_html(&test.result),
        date = test.test_date.format("%b %-d, %Y"),
        id = test.id,
    )
}

/// Delete buttons ask for confirmation, call the API and reload on success.
const LIST_SCRIPT: &str = r#"
document.querySelectorAll('[data-delete-id]').forEach(function (button) {
  button.addEventListener('click', async function () {
    if (!window.confirm('Are you sure you want to delete this test?')) {
      return;
    }
    const id = button.getAttribute('data-delete-id');
    try {
      const response = await fetch('/api/tests/' + id, { method: 'DELETE' });
      if (response.ok) {
        window.location.reload();
        return;
      }
      const data = await response.json().catch(function () { return {}; });
      if (response.status === 404) {
        window.alert(data.error || 'Diagnostic test not found');
      } else {
        console.error('Failed to delete test:', data.error || response.status);
      }
    } catch (error) {
      console.error('Error deleting test:', error);
    }
  });
});
"#;
