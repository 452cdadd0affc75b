#![allow(clippy::unwrap_used, clippy::expect_used)]

use sdkgen::generator::{generator_for, RenderContext};
use sdkgen::load_document;
use std::fs;
use std::path::PathBuf;

const WIDGET_SPEC: &str = r#"
openapi: 3.1.0
info:
  title: Widget API
  version: 1.0.0
paths:
  /v1/widgets:
    get:
      summary: List widgets
      parameters:
        - name: limit
          in: query
          required: false
          schema:
            type: number
      responses:
        default:
          description: A page of widgets
          content:
            application/json:
              schema:
                type: object
                properties:
                  object:
                    type: string
                    enum: [list]
                  data:
                    type: array
                    items:
                      $ref: '#/components/schemas/Widget'
  /v1/widgets/{id}:
    get:
      summary: Retrieve a widget
      parameters:
        - name: id
          in: path
          required: true
          schema:
            type: string
      responses:
        default:
          description: The widget
          content:
            application/json:
              schema:
                $ref: '#/components/schemas/Widget'
components:
  schemas:
    Widget:
      title: Widget
      type: object
      description: A widget tracked by the service.
      properties:
        id:
          type: string
"#;

fn write_spec(dir: &tempfile::TempDir) -> PathBuf {
    let path = dir.path().join("openapi.yaml");
    fs::write(&path, WIDGET_SPEC).unwrap();
    path
}

fn generate_into(spec: &PathBuf, out: &PathBuf) {
    let document = load_document(spec).unwrap();
    let generator = generator_for("typescript").unwrap();
    let mut ctx = RenderContext::new(out.clone()).unwrap();
    generator.generate(&mut ctx, &document).unwrap();
}

#[test]
fn test_generates_one_module_per_resource() {
    let dir = tempfile::tempdir().unwrap();
    let spec = write_spec(&dir);
    let out = dir.path().join("sdk");
    generate_into(&spec, &out);

    let widget = fs::read_to_string(out.join("Widget.ts")).unwrap();
    assert!(widget.contains("export interface Widget {"));
    assert!(widget.contains("readonly id?: string;"));
    assert!(widget.contains("export class WidgetResource {"));

    let index = fs::read_to_string(out.join("index.ts")).unwrap();
    assert!(index.contains("export { WidgetResource } from \"./Widget\";"));
    assert!(index.contains("\"Widget\""));
}

#[test]
fn test_operation_signatures() {
    let dir = tempfile::tempdir().unwrap();
    let spec = write_spec(&dir);
    let out = dir.path().join("sdk");
    generate_into(&spec, &out);

    let widget = fs::read_to_string(out.join("Widget.ts")).unwrap();

    // List: optional synthesized query object, envelope response type.
    assert!(widget.contains("async v1WidgetsGet(query?: V1WidgetsGetQuery): Promise<V1WidgetsGetResponse>"));
    assert!(widget.contains("export interface V1WidgetsGetQuery {"));
    assert!(widget.contains("readonly limit?: number;"));
    assert!(widget.contains("readonly data?: Widget[];"));

    // Retrieve: path parameter interpolated into a template literal.
    assert!(widget.contains("async v1WidgetsIdGet(id: string): Promise<Widget>"));
    assert!(widget.contains("`/v1/widgets/${id}`"));
    assert!(widget.contains("this.transport(\"GET\""));
}

#[test]
fn test_generation_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let spec = write_spec(&dir);

    let first_out = dir.path().join("first");
    generate_into(&spec, &first_out);
    let second_out = dir.path().join("second");
    generate_into(&spec, &second_out);

    for file in ["Widget.ts", "index.ts"] {
        let first = fs::read_to_string(first_out.join(file)).unwrap();
        let second = fs::read_to_string(second_out.join(file)).unwrap();
        assert_eq!(first, second, "{file} differs between runs");
    }
}

#[test]
fn test_unknown_platform_fails_before_io() {
    let err = match generator_for("fortran") {
        Err(e) => e,
        Ok(_) => panic!("fortran should not resolve"),
    };
    assert!(err.to_string().contains("unknown platform"));
}

#[test]
fn test_ungrouped_operations_produce_no_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("openapi.yaml");
    fs::write(
        &path,
        r#"
openapi: 3.1.0
info:
  title: Ping API
  version: 1.0.0
paths:
  /ping:
    get:
      responses:
        default:
          description: Pong
"#,
    )
    .unwrap();

    let out = dir.path().join("sdk");
    generate_into(&path, &out);

    // No resource could be inferred, so only the (empty) index is written.
    let index = fs::read_to_string(out.join("index.ts")).unwrap();
    assert!(!index.contains("export {"));
    assert!(!out.join("Ping.ts").exists());
}
