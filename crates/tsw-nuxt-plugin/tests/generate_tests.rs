use tsw_core::config::{ArgumentForm, GenerateOptions};
use tsw_core::ir::ApiDocument;
use tsw_core::{CodeGenerator, parse, transform};
use tsw_nuxt_plugin::{GeneratedSources, NuxtPluginConfig, NuxtPluginGenerator, generate};

const PETSTORE_V2: &str = include_str!("../../tsw-core/tests/fixtures/petstore-v2.json");
const SHOP_V3: &str = include_str!("../../tsw-core/tests/fixtures/petstore-v3.yaml");

fn petstore() -> ApiDocument {
    transform::transform(&parse::from_json(PETSTORE_V2).unwrap())
}

fn shop() -> ApiDocument {
    transform::transform(&parse::from_yaml(SHOP_V3).unwrap())
}

fn generate_default(doc: &ApiDocument) -> GeneratedSources {
    generate(doc, &GenerateOptions::default()).unwrap()
}

#[test]
fn swagger_client_calls() {
    let output = generate_default(&petstore()).client;

    assert!(output.contains(
        "get: (limit?: integer, XRequestId?: string, $config?: AxiosRequestConfig): Promise<Page<Pet>> => $axios.$get(`/v1/pets`, { headers: { 'X-Request-Id': XRequestId }, params: { limit }, ...$config })"
    ));
    assert!(output.contains(
        "post: ($body: Pet, $config?: AxiosRequestConfig): Promise<Pet> => $axios.$post(`/v1/pets`, $body, $config)"
    ));
    assert!(output.contains(
        "post: (file: File, caption?: string, $config?: AxiosRequestConfig): Promise<any> => $axios.$post(`/v1/pets/${petId}/photo`, $multipart({ file, caption }), $config)"
    ));
    assert!(output.contains("const $multipart = (o: any) => {"));
}

#[test]
fn swagger_path_parameters_are_curried() {
    let output = generate_default(&petstore()).client;

    assert!(output.contains("    /** @param petId  Pet id */\n    petId: (petId: integer) => ({\n"));
    assert!(output.contains(
        "      get: ($config?: AxiosRequestConfig): Promise<Pet> => $axios.$get(`/v1/pets/${petId}`, $config),"
    ));
    assert!(output.contains(
        "      delete: ($config?: AxiosRequestConfig): Promise<any> => $axios.$delete(`/v1/pets/${petId}`, $config),"
    ));
    assert!(output.contains("      photo: {\n        post: "));
}

#[test]
fn swagger_call_documentation() {
    let output = generate_default(&petstore()).client;

    assert!(output.contains("    /**\n     * List pets\n     *\n     * @param limit  Page size\n     */\n    get: "));
    assert!(output.contains(
        "    /**\n     * Create a pet\n     *\n     * 400: Invalid pet\n     *\n     * @returns Created pet\n     */\n    post: "
    ));
    assert!(output.contains("      /**\n       * 204: Deleted\n       *\n       * @deprecated\n       */\n      delete: "));
}

#[test]
fn many_query_parameters_are_bundled() {
    let output = generate_default(&petstore()).client;
    assert!(output.contains(
        "get: ({ name, email, status, page, size, sort }: { name?: string, email?: string, status?: 'active' | 'disabled', page?: integer, size?: integer, sort?: string } = {}, $config?: AxiosRequestConfig): Promise<Page<User>> => $axios.$get(`/v1/users/search`, { params: { name, email, status, page, size, sort }, ...$config })"
    ));
    assert!(output.contains("@param arg0\n       * @param arg0.sort  Sort order\n"));
}

#[test]
fn trailing_slash_becomes_root_key() {
    let output = generate_default(&petstore()).client;
    assert!(output.contains(
        "    $root: {\n      get: ($config?: AxiosRequestConfig): Promise<Array<User>> => $axios.$get(`/v1/users/`, $config)\n    }"
    ));
}

#[test]
fn underscore_form_keeps_path_arguments() {
    let options = GenerateOptions {
        form: ArgumentForm::Underscore,
        ..Default::default()
    };
    let output = generate(&petstore(), &options).unwrap().client;
    assert!(output.contains("    _petId: {\n"));
    assert!(output.contains(
        "get: (petId: integer, $config?: AxiosRequestConfig): Promise<Pet> => $axios.$get(`/v1/pets/${petId}`, $config)"
    ));
    assert!(output.contains(
        "post: (petId: integer, file: File, caption?: string, $config?: AxiosRequestConfig): Promise<any>"
    ));
    assert!(output.contains("get: ({ name, email, status, page, size, sort }: {"));
}

#[test]
fn skip_header_drops_header_parameters() {
    let options = GenerateOptions {
        skip_header: true,
        ..Default::default()
    };
    let output = generate(&petstore(), &options).unwrap().client;
    assert!(!output.contains("XRequestId"));
    assert!(output.contains(
        "get: (limit?: integer, $config?: AxiosRequestConfig): Promise<Page<Pet>> => $axios.$get(`/v1/pets`, { params: { limit }, ...$config })"
    ));
}

#[test]
fn swagger_definitions_merge_generic_pages() {
    let types = generate_default(&petstore()).types;

    assert!(types.contains(
        "\n/** Page */\nexport type Page<T> = {\n  content?: Array<T>\n  total?: integer\n}\n"
    ));
    assert_eq!(types.matches("export type Page").count(), 1);
    assert!(types.contains("export type Pet = {\n  id?: integer\n"));
    assert!(types.contains("   * @example  doggie\n   */\n  name: string\n"));
    assert!(types.contains("  status?: 'available' | 'sold'\n"));
    assert!(types.contains("\nexport type integer = number\n"));
}

#[test]
fn imports_cover_every_declaration() {
    let output = generate_default(&petstore()).client;
    assert!(output.contains("import { Page, Pet, User } from './types'\n"));
    assert!(output.contains(
        "import { binary, byte, date, dateTime, double, float, integer, long, password } from './types'\n"
    ));
}

#[test]
fn openapi_client_calls() {
    let output = generate_default(&shop()).client;

    assert!(output.contains(
        "get: (status?: OrderStatus, $config?: AxiosRequestConfig): Promise<Array<Order>> => $axios.$get(`/orders`, { params: { status }, ...$config })"
    ));
    assert!(output.contains(
        "post: ($body: Order, $config?: AxiosRequestConfig): Promise<Order> => $axios.$post(`/orders`, $body, $config)"
    ));
    assert!(output.contains("orderId: (orderId: string) => ({\n"));
    assert!(output.contains(
        "patch: ($body?: OrderPatch, $config?: AxiosRequestConfig): Promise<any> => $axios.$patch(`/orders/${orderId}`, $body, $config)"
    ));
    assert!(output.contains(
        "post: ($body: { file?: File }, $config?: AxiosRequestConfig): Promise<any> => $axios.$post(`/orders/${orderId}/attachments`, $multipart($body), $config)"
    ));
}

#[test]
fn openapi_definitions() {
    let types = generate_default(&shop()).types;

    assert!(types.contains("export type OrderStatus = 'placed' | 'shipped'\n"));
    assert!(types.contains(
        "export type Order = {\n  id: string\n  note?: string | null\n  status?: OrderStatus\n  meta?: { [key: string]: string }\n}\n"
    ));
    assert!(types.contains("export type OrderPatch = Order & {\n  reason?: string\n}\n"));
    assert!(types.contains("export type Payment = Card | Transfer\n"));
}

#[test]
fn axios_config_hook() {
    let options = GenerateOptions {
        plugin_name: "shop".into(),
        inject: "shop".into(),
        axios_config: true,
        ..Default::default()
    };
    let output = generate(&shop(), &options).unwrap().client;
    assert!(output.contains(
        "const $shop = ({ $axios, $config }: Context) => {\n  $axios = $axios.create([$config.tsw].flat().find(x => x?.pluginName === 'shop')?.axiosConfig)\n  return exposureAxios({\n    orders: {\n"
    ));
    assert!(output.contains("export default ((context, inject) => inject('shop', $shop(context))) as Plugin\n"));
}

#[test]
fn generator_returns_both_files() {
    let config = NuxtPluginConfig {
        options: GenerateOptions::default(),
        plugin_path: "plugins/api/index.ts".into(),
        type_path: "plugins/api/types.ts".into(),
    };
    let files = NuxtPluginGenerator.generate(&shop(), &config).unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!(files[0].path, "plugins/api/index.ts");
    assert!(files[0].content.contains("exposureAxios"));
    assert_eq!(files[1].path, "plugins/api/types.ts");
    assert!(files[1].content.contains("export type Order = "));
}

#[test]
fn generation_is_deterministic() {
    let doc = petstore();
    assert_eq!(generate_default(&doc), generate_default(&doc));
}
