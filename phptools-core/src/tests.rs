//! Comprehensive test suite for phptools-core.

use crate::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

fn write_file(file: &Path, content: &str) {
    fs::create_dir_all(file.parent().unwrap()).unwrap();
    fs::write(file, content).unwrap();
}

fn setup_temp_project() -> PathBuf {
    let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir()
        .join("phptools_tests")
        .join(format!("{}_{}", timestamp, id));

    if dir.exists() {
        fs::remove_dir_all(&dir).ok();
    }
    fs::create_dir_all(dir.join("src")).unwrap();
    dir
}

// E2E 1: declared and instantiated
#[test]
fn test_declared_and_used_is_clean() {
    let root = setup_temp_project();
    let file = root.join("src/Service.php");
    write_file(&file, "use Foo\\Bar;\nnew Bar();");

    let report = check_file(&file).unwrap();
    assert_eq!(report.missing, Vec::<String>::new());
    assert_eq!(report.unused, Vec::<String>::new());
    assert!(report.is_clean());
}

// E2E 2: instantiation without declaration or sibling
#[test]
fn test_missing_without_sibling() {
    let root = setup_temp_project();
    let file = root.join("src/Service.php");
    write_file(&file, "new Baz();");

    let report = check_file(&file).unwrap();
    assert_eq!(report.missing, vec!["Baz"]);
}

// E2E 2 (converse): a sibling file satisfies the reference
#[test]
fn test_sibling_file_satisfies_missing() {
    let root = setup_temp_project();
    let file = root.join("src/Service.php");
    write_file(&file, "new Baz();");
    write_file(&root.join("src/Baz.php"), "<?php class Baz {}");

    let report = check_file(&file).unwrap();
    assert!(report.is_clean());
}

// E2E 3: declared, never referenced
#[test]
fn test_unused_declaration() {
    let root = setup_temp_project();
    let file = root.join("src/Service.php");
    write_file(&file, "use App\\Unused;");

    let report = check_file(&file).unwrap();
    assert_eq!(report.unused, vec!["App\\Unused"]);
    assert!(report.missing.is_empty());
}

// P1: same text, same directory, same report
#[test]
fn test_check_is_idempotent() {
    let root = setup_temp_project();
    let file = root.join("src/Controller.php");
    write_file(
        &file,
        "<?php\nuse A\\Logger;\nuse B\\Cache;\nclass Controller extends Base implements Jsonable {\n    public function __construct(Request $r) { Str::of('x'); }\n}\n",
    );
    write_file(&root.join("src/Base.php"), "<?php");

    let first = check_file(&file).unwrap();
    let second = check_file(&file).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.missing, vec!["Request", "Str", "Jsonable"]);
    assert_eq!(first.unused, vec!["A\\Logger", "B\\Cache"]);
}

// P2: dedup by short name, first wins
#[test]
fn test_same_short_name_declared_once() {
    let declared = extract_declared("use Monolog\\Logger;\nuse Psr\\Log\\Logger;");
    assert_eq!(declared.len(), 1);
    assert_eq!(declared.get("Logger").unwrap().full_name, "Monolog\\Logger");

    let report = reconcile(&declared, &extract_usages(""));
    assert_eq!(report.unused, vec!["Monolog\\Logger"]);
}

// P3: built-ins are never missing and never satisfy a declaration
#[test]
fn test_builtin_names_are_excluded() {
    for builtin in BUILTIN_NAMES {
        let content = format!("use Vendor\\{b};\n{b}::thing();\nnew {b}();", b = builtin);
        let report = reconcile(&extract_declared(&content), &extract_usages(&content));
        assert!(report.missing.is_empty(), "{} reported missing", builtin);
        assert_eq!(report.unused, vec![format!("Vendor\\{}", builtin)]);
    }
}

// P3: built-ins are still stored
#[test]
fn test_builtins_are_stored() {
    let used = extract_usages("self::make(); static::boot();");
    assert!(used.get("self").is_some());
    assert!(used.get("static").is_some());
}

// P4: dynamic declarations are never unused
#[test]
fn test_siblings_never_unused() {
    let root = setup_temp_project();
    let file = root.join("src/Service.php");
    write_file(&file, "<?php class Service {}");
    write_file(&root.join("src/Unrelated.php"), "<?php");
    write_file(&root.join("src/Other.php"), "<?php");

    let report = check_file(&file).unwrap();
    assert!(report.unused.is_empty());
}

// Explicit declaration shadows a sibling of the same name.
#[test]
fn test_explicit_declaration_wins_over_sibling() {
    let root = setup_temp_project();
    let file = root.join("src/Service.php");
    write_file(&file, "use Other\\Helper;");
    write_file(&root.join("src/Helper.php"), "<?php");

    let report = check_file(&file).unwrap();
    assert_eq!(report.unused, vec!["Other\\Helper"]);
}

#[test]
fn test_check_source_uses_given_directory() {
    let root = setup_temp_project();
    write_file(&root.join("src/Mailer.php"), "<?php");

    let report = check_source("Mailer::send();", &root.join("src")).unwrap();
    assert!(report.is_clean());

    let elsewhere = check_source("Mailer::send();", &root).unwrap();
    assert_eq!(elsewhere.missing, vec!["Mailer"]);
}

#[test]
fn test_missing_file_is_io_error() {
    let root = setup_temp_project();
    let err = check_file(&root.join("src/Nope.php")).unwrap_err();
    assert!(matches!(err, PhptoolsError::Io { .. }));
    assert_eq!(err.path(), Some(&root.join("src/Nope.php")));
}

#[test]
fn test_realistic_controller() {
    let root = setup_temp_project();
    let file = root.join("src/UserController.php");
    write_file(
        &file,
        r#"<?php

namespace App\Http\Controllers;

use App\Models\User;
use Illuminate\Http\Request;
use Illuminate\Support\Facades\Log;
use Symfony\Component\Routing\Annotation\Route;
use Doctrine\ORM\Mapping as ORM;

/**
 * @ORM\Entity
 */
class UserController extends Controller implements \JsonSerializable
{
    /**
     * @Route("/users")
     */
    public function index(Request $request)
    {
        $users = User::all();
        $carbon = new \Carbon\Carbon();
        return new JsonResponse($users);
    }
}
"#,
    );
    write_file(&root.join("src/Controller.php"), "<?php");

    let report = check_file(&file).unwrap();
    assert_eq!(report.missing, vec!["JsonResponse"]);
    assert_eq!(report.unused, vec!["Illuminate\\Support\\Facades\\Log"]);
}

#[test]
fn test_nested_annotation_import_is_used() {
    let content = "<?php\nuse Symfony\\Constraint;\nuse Symfony\\Assert;\n\n/**\n * @Assert\\All(@Constraint\\Type(\"string\"))\n */\n";
    let report = reconcile(&extract_declared(content), &extract_usages(content));
    assert!(report.is_clean(), "{:?}", report);
}

#[test]
fn test_rendered_report() {
    let report = reconcile(
        &extract_declared("use App\\Unused;"),
        &extract_usages("new Baz();"),
    );
    assert_eq!(
        render_plain(&report).unwrap(),
        "Missing uses:\n    Baz\n\nUnused uses:\n    App\\Unused\n"
    );
}

// E2E 4
#[test]
fn test_single_documented_property() {
    let props = extract_properties("/**\n * The id.\n * @var int\n */\npublic $id;");
    assert_eq!(props.len(), 1);
    assert_eq!(
        props.iter().next().unwrap(),
        &Property::new("id", Some("int"), Some("The id."))
    );

    let fragments = render_fragments(&props);
    assert_eq!(fragments.arguments, "int $id");
    assert!(fragments.affectations.ends_with("id = $id;"));
}

// E2E 5
#[test]
fn test_nullable_type_defaults_to_null() {
    let props = extract_properties("/**\n * @var ?string\n */\npublic $name;");
    assert_eq!(render_fragments(&props).arguments, "string $name = null");
}

// P5: alignment law over a larger class
#[test]
fn test_alignment_law() {
    let content = "class Order {\n    /**\n     * Identifier.\n     * @var int\n     */\n    public $id;\n    /**\n     * @var ?\\DateTimeImmutable\n     */\n    protected $createdAt;\n    private $x;\n    /**\n     * Customer notes.\n     * @var string\n     */\n    var $notes;\n}";
    let props = extract_properties(content);
    assert_eq!(props.len(), 4);

    let fragments = render_fragments(&props);
    let dollar: Vec<usize> = fragments
        .docblock
        .split("\n * ")
        .map(|l| l.find('$').unwrap())
        .collect();
    assert!(dollar.iter().all(|c| *c == dollar[0]), "{:?}", dollar);

    let equals: Vec<usize> = fragments
        .affectations
        .split("\n\t")
        .map(|l| l.find('=').unwrap())
        .collect();
    assert!(equals.iter().all(|c| *c == equals[0]), "{:?}", equals);
}

#[test]
fn test_generate_from_template_file() {
    let root = setup_temp_project();
    let tpl = root.join("ctor.tpl");
    write_file(&tpl, "function __construct({{arguments}}) {\n    {{affectations}}\n}\n");

    let template = Template::load(&tpl).unwrap();
    let code = generate_constructor("class A {\n    public $a;\n}", &template).unwrap();
    assert_eq!(code, "function __construct($a) {\n    $this->a = $a;\n}\n");
}

#[test]
fn test_snippet_escaping_of_generated_code() {
    let code = generate_constructor("/**\n * @var int\n */\npublic $id;", &Template::builtin()).unwrap();
    let snippet = escape_snippet(&code);
    assert!(snippet.contains("int \\$id"));
    assert!(!snippet.replace("\\$", "").contains('$'));
}

#[test]
fn test_config_template_override() {
    let root = setup_temp_project();
    write_file(&root.join(CONFIG_FILE_NAME), "[constructor]\ntemplate = \"ctor.tpl\"\n");
    write_file(&root.join("ctor.tpl"), "({{arguments}})");

    let cfg = load_config(&root).unwrap().unwrap();
    let template = Template::load(&cfg.template_path(&root).unwrap()).unwrap();
    let code = generate_constructor("\nprivate $a;\nprivate $b;", &template).unwrap();
    assert_eq!(code, "($a, $b)");
}

#[test]
fn test_logging_helpers_without_subscriber() {
    log_info("test info");
    log_warn("test warn");
    log_error("test error");
}
