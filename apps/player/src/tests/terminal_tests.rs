use super::*;

use std::sync::Arc;

use loader::parse_table;

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().expect("buffer").clone()).expect("utf8")
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("buffer").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn quotes_and_titles_print_their_first_row() {
    let quote = parse_table("Quote\nTo be is to belong.\n").expect("parse");
    assert_eq!(render_text(RenderKind::Quote, &quote), "\"To be is to belong.\"");

    let title = parse_table("Title\nHeritage\n").expect("parse");
    assert_eq!(render_text(RenderKind::Title, &title), "== Heritage ==");

    assert_eq!(
        render_text(RenderKind::Quote, &title),
        "(no Quote column)"
    );
}

#[test]
fn bar_charts_list_name_value_pairs() {
    let table = parse_table("Region,Percent\nNortheast,40\nSouth,20\n").expect("parse");
    let text = render_text(RenderKind::Bar, &table);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("Northeast"));
    assert!(lines[0].ends_with(&"#".repeat(30)));
    assert!(lines[1].ends_with(&"#".repeat(15)));
}

#[test]
fn all_zero_values_print_rows_without_bars() {
    let table = parse_table("Region,Percent\nEast,0\nWest,0\n").expect("parse");
    let text = render_text(RenderKind::Pie, &table);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines.iter().all(|line| line.ends_with('0') && !line.contains('#')));
}

#[test]
fn other_charts_print_their_shape() {
    let table = parse_table("id,parent id,value\nroot,,\nleaf,root,3\n").expect("parse");
    assert_eq!(
        render_text(RenderKind::CircleHierarchy, &table),
        "<circle_hierarchy: 2 rows x 3 columns>"
    );
    assert_eq!(
        render_text(RenderKind::Pie, &table),
        "(nothing to draw)"
    );
}

#[test]
fn presenter_writes_visibility_caption_and_body() {
    let buffer = SharedBuffer::default();
    let presenter = TerminalPresenter::new(Box::new(buffer.clone()));
    let table = parse_table("Quote\nStay a while.\n").expect("parse");

    presenter.show_only(&[StepId(3)]);
    presenter.render(StepId(3), RenderKind::Quote, &table);
    presenter.set_caption("Voices");

    assert_eq!(
        buffer.contents(),
        "--- step 3 ---\n\"Stay a while.\"\n[Voices]\n"
    );
}
